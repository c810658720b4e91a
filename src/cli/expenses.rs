use super::ui;
use crate::core::{Expense, ExpenseRenderer, Totals};
use comfy_table::Cell;

/// Renders the expense list and totals as a table.
pub fn display_as_table(expenses: &[Expense], totals: &Totals) -> String {
    if expenses.is_empty() {
        return ui::style_text("No expenses yet.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Description"),
        ui::header_cell("Qty"),
        ui::header_cell("Amount"),
        ui::header_cell("Converted"),
    ]);

    for (index, expense) in expenses.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(&expense.description),
            Cell::new(expense.quantity),
            Cell::new(format!("{} {}", expense.amount, expense.currency_from)),
            Cell::new(format!(
                "{:.2} {}",
                expense.converted_amount, expense.currency_to
            )),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Expenses", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {}\n{} {}",
        ui::style_text("Total (origin):", ui::StyleType::TotalLabel),
        ui::style_text(&format!("{:.2}", totals.origin), ui::StyleType::TotalValue),
        ui::style_text("Total (destination):", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.2}", totals.destination),
            ui::StyleType::TotalValue
        ),
    ));
    output
}

/// Prints the list to stdout after every change.
pub struct TableRenderer;

impl ExpenseRenderer for TableRenderer {
    fn render(&self, expenses: &[Expense], totals: &Totals) {
        println!("{}", display_as_table(expenses, totals));
    }
}
