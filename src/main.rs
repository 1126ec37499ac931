fn main() -> anyhow::Result<()> {
    lctop::cli::run()
}
