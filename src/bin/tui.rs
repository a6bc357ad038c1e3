use anyhow::Result;

fn main() -> Result<()> {
    syltrack::tui::run()
}
