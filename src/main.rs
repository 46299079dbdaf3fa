use std::io::Write;

fn main() -> anyhow::Result<()> {
    // developer sink: file/line tagged, unbounded
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}({}): {}",
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .init();

    vantage::app::run()
}
