/*! Integration tests for ydot.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * - snapshot: Loading updates produced by real yrs documents
 * - view: End-to-end rendering of item collections
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ydot=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod helpers;
mod snapshot;
mod view;
