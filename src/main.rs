fn main() -> anyhow::Result<()> {
    opal_cli::run_cli()
}
