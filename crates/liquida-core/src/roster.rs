use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::LiquidaError;
use crate::model::{Period, Technician};
use crate::parsing::normalize::normalize_name;

/// All known technicians keyed by normalized name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    technicians: Vec<Technician>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.technicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technicians.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Technician> {
        self.technicians.iter()
    }

    pub fn technicians(&self) -> &[Technician] {
        &self.technicians
    }

    /// Look up by normalized key.
    pub fn get(&self, key: &str) -> Option<&Technician> {
        self.index.get(key).map(|&i| &self.technicians[i])
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Technician> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.technicians[i]),
            None => None,
        }
    }

    /// Append a technician. An existing entry with the same key is kept.
    pub(crate) fn insert(&mut self, technician: Technician) -> &mut Technician {
        let i = match self.index.get(&technician.normalized_key) {
            Some(&i) => i,
            None => {
                let i = self.technicians.len();
                self.index.insert(technician.normalized_key.clone(), i);
                self.technicians.push(technician);
                i
            }
        };
        &mut self.technicians[i]
    }

    /// Find a technician by any rendering of their name.
    pub fn find(&self, name: &str) -> Result<&Technician, LiquidaError> {
        self.get(&normalize_name(name))
            .ok_or_else(|| LiquidaError::TechnicianNotFound(name.trim().to_string()))
    }

    /// Every period present in any technician's history, most recent first.
    /// Labels that do not parse as a month sort last, alphabetically.
    pub fn available_periods(&self) -> Vec<Period> {
        let mut periods: Vec<Period> = Vec::new();
        for m in self.technicians.iter().flat_map(|t| t.months.iter()) {
            if !periods.contains(&m.period) {
                periods.push(m.period.clone());
            }
        }
        periods.sort_by(compare_periods_desc);
        periods
    }

    /// The most recent period, if any.
    pub fn latest_period(&self) -> Result<Period, LiquidaError> {
        self.available_periods()
            .into_iter()
            .next()
            .ok_or(LiquidaError::NoPeriods)
    }
}

fn compare_periods_desc(a: &Period, b: &Period) -> Ordering {
    match (a.implied_date(), b.implied_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label().cmp(b.label()),
    }
}
