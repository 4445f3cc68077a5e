//! End-to-end integration tests
//!
//! These tests validate the complete transfer pipeline using predefined CSV
//! fixtures. Each test:
//! 1. Reads accounts.csv and transfers.csv from a fixture directory
//! 2. Runs every transfer through the selected strategy
//! 3. Compares the balances CSV with expected.csv
//! 4. For sequential runs, compares the per-transfer report with
//!    expected_results.csv when the fixture has one
//!
//! Fixtures whose final balances do not depend on execution order run under
//! both strategies. Order-dependent fixtures run sequentially only.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_transfer_engine::cli::StrategyType;
    use rust_transfer_engine::core::LockPolicy;
    use rust_transfer_engine::io::write_results_csv;
    use rust_transfer_engine::strategy::create_strategy;
    use rust_transfer_engine::TransferError;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a fixture and compare balances (and the report, if sequential)
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Fixture files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, lock_policy: LockPolicy) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let accounts_path = format!("{}/accounts.csv", fixture_dir);
        let transfers_path = format!("{}/transfers.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);
        let expected_results_path = format!("{}/expected_results.csv", fixture_dir);

        for path in [&accounts_path, &transfers_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        let strategy = create_strategy(strategy_type, lock_policy, None);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        let results = strategy
            .process(
                Path::new(&accounts_path),
                Path::new(&transfers_path),
                &mut temp_output,
            )
            .unwrap_or_else(|e| panic!("Failed to process transfers: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?}, locks: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, lock_policy, actual_output, expected_output
        );

        if strategy_type == StrategyType::Sync && Path::new(&expected_results_path).exists() {
            let mut report = Vec::new();
            write_results_csv(&results, &mut report).expect("Failed to write results");
            let actual_report = String::from_utf8(report).expect("Report is not UTF-8");
            let expected_report = fs::read_to_string(&expected_results_path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", expected_results_path, e));

            assert_eq!(
                actual_report, expected_report,
                "\n\nReport mismatch for fixture: {}\n",
                fixture_name
            );
        }
    }

    /// Order-independent fixtures with both strategies and both lock policies
    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_funds")]
    #[case("account_not_found")]
    #[case("same_account")]
    #[case("malformed_data")]
    #[case("duplicate_accounts")]
    #[case("precision")]
    #[case("non_positive_amounts")]
    #[case("no_transfers")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
        #[values(LockPolicy::Global, LockPolicy::PerAccount)] lock_policy: LockPolicy,
    ) {
        run_test_fixture(fixture, strategy, lock_policy);
    }

    /// Fixtures whose outcome depends on file order
    #[rstest]
    #[case("sequential_chain")]
    fn test_sequential_fixtures(
        #[case] fixture: &str,
        #[values(LockPolicy::Global, LockPolicy::PerAccount)] lock_policy: LockPolicy,
    ) {
        run_test_fixture(fixture, StrategyType::Sync, lock_policy);
    }

    #[rstest]
    fn test_missing_input_is_fatal(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let strategy = create_strategy(strategy_type, LockPolicy::default(), None);
        let mut output = Vec::new();

        let result = strategy.process(
            Path::new("tests/fixtures/does_not_exist/accounts.csv"),
            Path::new("tests/fixtures/happy_path/transfers.csv"),
            &mut output,
        );

        assert!(matches!(result, Err(TransferError::FileNotFound { .. })));
        assert!(output.is_empty());
    }
}
