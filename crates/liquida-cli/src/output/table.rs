use liquida_core::commission::{CommissionOutcome, GoalStatus};
use liquida_core::model::Period;
use liquida_core::parsing::values::round_currency;
use liquida_core::ranking::{Ranking, RankingEntry, SearchHit};
use liquida_core::report::{RosterSummary, TechnicianMonthReport};
use liquida_core::settings::schema::Settings;
use rust_decimal::Decimal;

/// Whole currency units with `.` thousands separators: `$5.800.000`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

pub fn print_periods(periods: &[Period]) {
    if periods.is_empty() {
        println!("No periods loaded.");
        return;
    }
    for p in periods {
        println!("  {p}");
    }
}

fn print_entry(e: &RankingEntry, name_width: usize) {
    println!(
        "  {:>2}. {:<width$}  {:>14}  {:>4} tareas  {:>6}%",
        e.position,
        e.name,
        format_currency(e.net_total),
        e.task_count,
        e.percentage,
        width = name_width
    );
}

pub fn print_ranking(ranking: &Ranking) {
    println!("=== Ranking {} ({}) ===\n", ranking.period, ranking.zone);
    if ranking.is_empty() {
        println!("  No technicians with production in this period.");
        return;
    }
    let ordered = ranking.ordered();
    let width = ordered.iter().map(|e| e.name.chars().count()).max().unwrap_or(10);

    let podium: Vec<String> = ranking
        .podium
        .iter()
        .map(|e| format!("[{}] {}", e.position, e.name))
        .collect();
    println!("  Podio: {}\n", podium.join("   "));

    for e in ordered {
        print_entry(e, width);
    }
}

fn print_report(r: &TechnicianMonthReport) {
    println!("--- {} ---\n", r.period);
    println!("  Neto:            {}", format_currency(r.net_total));
    println!("  Tareas:          {}", r.task_count);
    if let Some(days) = r.worked_days {
        println!("  Días laborados:  {days}");
    }
    println!("  Meta:            {}", format_currency(r.base_goal));
    if r.effective_goal != r.base_goal {
        println!("  Meta prorrateada: {}", format_currency(r.effective_goal));
    }
    println!("  Cumplimiento:    {}% ({})", r.percentage, r.status);
    print_outcome(&r.commission);

    if !r.breakdown.is_empty() {
        println!("\n  Por tipo:");
        for b in &r.breakdown {
            println!(
                "    {:<16} {:>4}  {:>14}",
                b.kind.to_string(),
                b.count,
                format_currency(b.net)
            );
        }
    }

    if !r.tag_summary.is_empty() {
        println!("\n  Por tipología:");
        for t in &r.tag_summary {
            println!(
                "    {:<16} {:>4}  {:>14}  -{:<5} {:>14}",
                t.tag,
                t.count,
                format_currency(t.gross),
                format_rate(t.discount_rate),
                format_currency(t.net)
            );
        }
        println!("    Bruto:       {}", format_currency(r.gross_total));
        println!("    Descuentos:  {}", format_currency(r.discount_total));
    }

    if !r.tasks.is_empty() {
        println!("\n  Tareas:");
        for t in &r.tasks {
            let place = if t.location.is_empty() { &t.city } else { &t.location };
            println!(
                "    {:<19} {:<12} {:<24} {:<26} {:>12}",
                t.closed_at,
                t.code,
                t.activity_type,
                format!("{place} [{}]", t.zone.code()),
                format_currency(t.net_value)
            );
        }
    }
}

pub fn print_reports(name: &str, reports: &[TechnicianMonthReport]) {
    println!("=== {name} ===\n");
    if reports.is_empty() {
        println!("  No months on record.");
        return;
    }
    for (i, r) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_report(r);
    }
}

fn print_outcome(outcome: &CommissionOutcome) {
    if outcome.goal_met {
        println!("  Excedente:       {}", format_currency(outcome.excess));
        println!("  Nivel:           {}", outcome.tier_label());
        println!("  Comisión:        {}", format_currency(outcome.commission));
    } else {
        println!("  Comisión:        {} (meta no alcanzada)", format_currency(outcome.commission));
    }
}

pub fn print_commission(
    net_total: Decimal,
    base_goal: Decimal,
    effective_goal: Decimal,
    percentage: Decimal,
    outcome: &CommissionOutcome,
) {
    println!("  Neto:            {}", format_currency(net_total));
    println!("  Meta:            {}", format_currency(base_goal));
    if effective_goal != base_goal {
        println!("  Meta prorrateada: {}", format_currency(effective_goal));
    }
    println!(
        "  Cumplimiento:    {}% ({})",
        percentage,
        GoalStatus::from_percentage(percentage)
    );
    print_outcome(outcome);
}

pub fn print_search(query: &str, period: &Period, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No technicians match '{query}'.");
        return;
    }
    let width = hits.iter().map(|h| h.name.chars().count()).max().unwrap_or(10);
    for h in hits {
        println!(
            "  {:<width$}  {:>14}  ({period})",
            h.name,
            format_currency(h.net_total),
            width = width
        );
    }
}

pub fn print_summary(summary: &RosterSummary) {
    println!("  Técnicos:  {}", summary.technicians);
    println!("  Tareas:    {}", summary.total_tasks);
    println!("  Neto:      {}", format_currency(summary.total_net));
    let periods: Vec<&str> = summary.periods.iter().map(|p| p.label()).collect();
    println!("  Periodos:  {}", periods.join(", "));
}

pub fn print_settings(settings: &Settings) {
    let plan = &settings.commission;
    println!("=== {} (v{}) ===\n", plan.name, plan.version);
    if let Some(desc) = &plan.description {
        println!("  {desc}\n");
    }
    println!("  Meta mensual: {}\n", format_currency(plan.monthly_goal));
    for t in &plan.tiers {
        let upper = t
            .max_excess
            .map(format_currency)
            .unwrap_or_else(|| "∞".into());
        println!(
            "  Nivel {:<3} [{} - {})  {}",
            t.label,
            format_currency(t.min_excess),
            upper,
            format_rate(t.rate)
        );
    }

    let zones = &settings.zones;
    println!("\n=== {} (v{}) ===\n", zones.name, zones.version);
    for z in &zones.zones {
        println!("  {:<26} {}", z.zone.code(), z.keywords.join(", "));
    }

    let discounts = &settings.discounts;
    println!("\n=== {} (v{}) ===\n", discounts.name, discounts.version);
    for d in &discounts.rates {
        println!("  {:<12} {}", d.tag, format_rate(d.rate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_groups() {
        assert_eq!(format_currency(Decimal::from(5_800_000)), "$5.800.000");
        assert_eq!(format_currency(Decimal::from(174_000)), "$174.000");
        assert_eq!(format_currency(Decimal::from(999)), "$999");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency(Decimal::from(-5000)), "-$5.000");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Decimal::new(15, 2)), "15%");
        assert_eq!(format_rate(Decimal::new(125, 3)), "12.5%");
    }
}
