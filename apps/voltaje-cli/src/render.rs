//! Plain-text rendering of a priced quote.
//!
//! ```text
//! Pricing mode: quote-level
//!
//!   Breaker 20A                         2 x      $ 38.000 =      $ 76.000
//!   Salida eléctrica                    1 x      $ 85.000 =      $ 85.000
//!       · Cable                       2.5 x       $ 3.200 =       $ 8.000
//!
//!   Subtotal                                                    $ 161.000
//!   ...
//!   Grand total                                                 $ 191.590
//! ```

use std::fmt::Write;
use voltaje_core::work_code::MaterialRequirement;
use voltaje_core::{CurrencyFormat, Money, Totals};

const DESCRIPTION_WIDTH: usize = 32;
const AMOUNT_WIDTH: usize = 14;

pub fn render_text(totals: &Totals, format: &CurrencyFormat) -> String {
    let mut out = String::new();
    let money = |m: Money| m.format(format);

    let _ = writeln!(out, "Pricing mode: {}", totals.mode);
    let _ = writeln!(out);

    if totals.lines.is_empty() {
        let _ = writeln!(out, "  (no items)");
    }

    for line in &totals.lines {
        let _ = writeln!(
            out,
            "  {:<dw$} {:>5} x {:>aw$} = {:>aw$}",
            truncate(&line.description, DESCRIPTION_WIDTH),
            line.quantity,
            money(line.unit_price),
            money(line.line_total),
            dw = DESCRIPTION_WIDTH,
            aw = AMOUNT_WIDTH,
        );
        if let Some(aiu) = &line.aiu {
            let _ = writeln!(
                out,
                "      cost {} ({:?}), A {} I {} U {}, tax on profit {}",
                money(aiu.unit_cost),
                aiu.cost_source,
                money(aiu.admin),
                money(aiu.contingency),
                money(aiu.profit),
                money(aiu.tax_on_profit),
            );
        }
        if line.sub_items_hidden {
            let _ = writeln!(out, "      (kit contents hidden)");
        }
        for sub in &line.sub_items {
            let _ = writeln!(
                out,
                "      · {:<dw$} {:>5} x {:>aw$} = {:>aw$}",
                truncate(&sub.name, DESCRIPTION_WIDTH - 4),
                sub.quantity.normalize(),
                money(sub.unit_price),
                money(sub.total),
                dw = DESCRIPTION_WIDTH - 4,
                aw = AMOUNT_WIDTH,
            );
        }
    }

    let _ = writeln!(out);
    let mut row = |label: &str, amount: Money| {
        let _ = writeln!(out, "  {:<44} {:>aw$}", label, money(amount), aw = AMOUNT_WIDTH + 8);
    };
    row("Subtotal", totals.subtotal);
    row("Discount", totals.discount_amount);
    row("Discounted subtotal", totals.discounted_subtotal);
    if !totals.aiu_total().is_zero() {
        row("Administration", totals.aiu_admin_amount);
        row("Contingency", totals.aiu_contingency_amount);
        row("Profit", totals.aiu_profit_amount);
    }
    if !totals.tax_on_profit_amount.is_zero() {
        row("Tax on profit", totals.tax_on_profit_amount);
    }
    row("Taxable base", totals.taxable_base);
    row("VAT", totals.tax_amount);
    row("Grand total", totals.grand_total);

    out
}

pub fn render_materials(requirements: &[MaterialRequirement], format: &CurrencyFormat) -> String {
    let mut out = String::from("Material requirements:\n");
    if requirements.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let mut total = Money::zero();
    for req in requirements {
        total += req.estimated_cost;
        let _ = writeln!(
            out,
            "  {:<dw$} {:>10} {:>aw$}",
            truncate(&req.name, DESCRIPTION_WIDTH),
            req.quantity.normalize(),
            req.estimated_cost.format(format),
            dw = DESCRIPTION_WIDTH,
            aw = AMOUNT_WIDTH,
        );
    }
    let _ = writeln!(
        out,
        "  {:<dw$} {:>10} {:>aw$}",
        "Estimated total",
        "",
        total.format(format),
        dw = DESCRIPTION_WIDTH,
        aw = AMOUNT_WIDTH,
    );
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
