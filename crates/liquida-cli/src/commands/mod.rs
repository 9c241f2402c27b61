pub mod calc;
pub mod data;
pub mod load;
pub mod settings;
