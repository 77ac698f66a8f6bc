mod app;
mod cli;
mod config;
mod constants;
mod domain;
mod logging;
mod session;
mod shutdown;
mod storage;

fn main() {
    cli::run_cli();
}
