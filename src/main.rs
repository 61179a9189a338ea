mod app;
mod audio;
mod auth;
mod catalog;
mod config;
mod error;
mod liked;
mod logging;
mod player;
mod runtime;
mod search;
mod storage;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
