pub mod activity;
pub mod aggregate;
pub mod commission;
pub mod error;
pub mod extraction;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod parsing;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod settings;
pub mod zones;

use rust_decimal::Decimal;

use commission::{compute_commission, effective_goal, CommissionOutcome};
use error::LiquidaError;
use ingest::{BatchReport, BulkDataset, SourceBatch};
use merge::MergeSummary;
use model::{Period, Technician, Zone, ZoneFilter};
use ranking::{Ranking, SearchHit};
use report::{RosterSummary, TechnicianMonthReport};
use roster::Roster;
use settings::schema::Settings;
use zones::ZoneClassifier;

/// The loaded roster together with the configuration it is evaluated
/// against. Every query goes through this context.
#[derive(Debug, Clone)]
pub struct Dashboard {
    roster: Roster,
    settings: Settings,
    classifier: ZoneClassifier,
}

impl Dashboard {
    pub fn new(settings: Settings) -> Self {
        let classifier = ZoneClassifier::new(&settings.zones);
        Dashboard {
            roster: Roster::new(),
            settings,
            classifier,
        }
    }

    /// Dashboard with the built-in commission plan, zone table and
    /// tipología discounts.
    pub fn with_defaults() -> Result<Self, LiquidaError> {
        Ok(Self::new(settings::builtin::load_default()?))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn monthly_goal(&self) -> Decimal {
        self.settings.commission.monthly_goal
    }

    pub fn set_monthly_goal(&mut self, goal: Decimal) -> Result<(), LiquidaError> {
        if goal <= Decimal::ZERO {
            return Err(LiquidaError::SettingsInvalid(format!(
                "monthly goal must be positive, got {goal}"
            )));
        }
        self.settings.commission.monthly_goal = goal;
        Ok(())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Drop all loaded data, keeping the configuration.
    pub fn clear(&mut self) {
        self.roster = Roster::new();
    }

    pub fn load_bulk(&mut self, dataset: BulkDataset) -> MergeSummary {
        ingest::apply_bulk(&mut self.roster, &self.classifier, dataset)
    }

    pub fn apply_batch(&mut self, batch: SourceBatch) -> BatchReport {
        ingest::apply_batch(&mut self.roster, &self.classifier, &self.settings.discounts, batch)
    }

    pub fn available_periods(&self) -> Vec<Period> {
        self.roster.available_periods()
    }

    pub fn latest_period(&self) -> Result<Period, LiquidaError> {
        self.roster.latest_period()
    }

    pub fn technician(&self, name: &str) -> Result<&Technician, LiquidaError> {
        self.roster.find(name)
    }

    pub fn classify(&self, warehouse: &str, department: &str, city: &str, venue_city: &str) -> Zone {
        self.classifier.classify(warehouse, department, city, venue_city)
    }

    /// Commission for an arbitrary net total against `goal`.
    pub fn commission(&self, net_total: Decimal, goal: Decimal) -> CommissionOutcome {
        compute_commission(net_total, goal, &self.settings.commission.tiers)
    }

    /// Commission for one technician's month, against the prorated goal.
    pub fn commission_for(&self, name: &str, period: &Period) -> Result<CommissionOutcome, LiquidaError> {
        let technician = self.roster.find(name)?;
        let month = technician
            .month(period)
            .ok_or_else(|| LiquidaError::PeriodNotFound {
                technician: technician.name.clone(),
                period: period.to_string(),
            })?;
        let goal = effective_goal(self.monthly_goal(), month.worked_days);
        Ok(self.commission(month.net_total, goal))
    }

    pub fn rank(&self, period: &Period, zone: ZoneFilter) -> Ranking {
        ranking::rank(&self.roster, period, zone, self.monthly_goal())
    }

    pub fn search(&self, query: &str, period: &Period) -> Vec<SearchHit> {
        ranking::search(&self.roster, query, period)
    }

    pub fn month_report(&self, name: &str, period: &Period) -> Result<TechnicianMonthReport, LiquidaError> {
        report::month_report(self.roster.find(name)?, period, &self.settings.commission)
    }

    pub fn summary(&self) -> RosterSummary {
        report::summarize(&self.roster)
    }
}
