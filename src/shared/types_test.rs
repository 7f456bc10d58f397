//! Test to trigger ts-rs bindings export
//! Run with: cargo test export_bindings

#[cfg(test)]
mod tests {
    use crate::shared::events::AppEvent;
    use crate::shared::settings::AppSettings;
    use crate::shared::types::*;
    use ts_rs::TS;

    #[test]
    fn export_bindings() {
        // Command surface payloads
        ShellStatus::export().expect("Failed to export ShellStatus");
        RoutingOutcome::export().expect("Failed to export RoutingOutcome");
        PointerSample::export().expect("Failed to export PointerSample");

        // Event payloads and settings
        AppEvent::export().expect("Failed to export AppEvent");
        AppSettings::export().expect("Failed to export AppSettings");
    }
}
