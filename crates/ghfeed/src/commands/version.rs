pub fn run() -> anyhow::Result<()> {
    println!("ghfeed {}", env!("CARGO_PKG_VERSION"));
    println!("Cached GitHub activity feeds with sorting and stats");
    Ok(())
}
