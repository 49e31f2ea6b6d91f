mod app;
mod game;
mod net;
mod storage;
mod timers;
mod ui;

fn main() {
    if let Err(e) = app::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
