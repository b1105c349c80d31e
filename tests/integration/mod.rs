//! Integration tests driving the public service API and the CLI context
//! against CSV fixtures in temporary directories.

mod cli_contracts;
mod concurrency;
mod parse_help_parity;
mod service_contracts;
mod support;
