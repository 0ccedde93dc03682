pub mod controller;
pub mod interactive;
pub mod render;
pub mod setup;
pub mod ui;

use crate::core::InputError;
use controller::ViewController;
use indicatif::ProgressBar;
use std::io::Write;

/// Starts a spinner and routes section updates through it, so each section is
/// printed the moment it resolves without tearing the spinner line.
pub fn attach_spinner(controller: &mut ViewController<'_>, message: &str) -> ProgressBar {
    let spinner = ui::new_spinner(message);
    let printer = spinner.clone();
    controller.set_observer(move |section, content| {
        printer.suspend(|| println!("{}\n", render::render_section(section, content)));
    });
    spinner
}

fn write_alert(out: &mut impl Write, message: &str) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        ui::style_text(&format!("⚠ {message}"), ui::StyleType::Error)
    )
}

/// Prints a validation problem the way a blocking alert would be shown.
pub fn print_alert(message: &str) {
    if let Err(e) = write_alert(&mut std::io::stderr(), message) {
        tracing::debug!(error = %e, "Failed to write alert");
    }
}

/// Shows a rejected input as an alert and hands the error back to the caller.
pub fn alert_on_error(outcome: Result<(), InputError>) -> Result<(), InputError> {
    if let Err(e) = &outcome {
        print_alert(&e.to_string());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_is_a_single_marked_line() {
        let mut out = Vec::new();
        write_alert(&mut out, &InputError::EmptyQuery.to_string()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            console::strip_ansi_codes(&text),
            "⚠ Please enter a stock name or symbol\n"
        );
    }

    #[test]
    fn test_alert_on_error_passes_outcome_through() {
        assert_eq!(alert_on_error(Ok(())), Ok(()));
        assert_eq!(
            alert_on_error(Err(InputError::ComparisonCount { given: 5 })),
            Err(InputError::ComparisonCount { given: 5 })
        );
    }
}
