fn main() -> anyhow::Result<()> {
    parsebench::run()
}
