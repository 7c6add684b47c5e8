fn main() -> anyhow::Result<()> {
    oneroster_filter::cli::run()
}
