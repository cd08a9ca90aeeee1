fn main() -> anyhow::Result<()> {
    chronodial_lib::run()
}
