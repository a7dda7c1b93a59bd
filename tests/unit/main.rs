mod scenario_tests;
mod snapshot_tests;
mod validation_tests;
