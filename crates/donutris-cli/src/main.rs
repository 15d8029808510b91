mod command;
mod input;
mod tui;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
