use memoboard::board::MemoBoard;
use memoboard::config::BoardConfig;
use memoboard::store::FileStore;

/// Journal logger that keeps memoboard at info/debug (per config) and
/// everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("memoboard") || metadata.target().starts_with("board_check") {
            let max = if memoboard::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn init_logging(config: &BoardConfig) {
    memoboard::set_debug_logging(config.debug_logging);
    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("memoboard-check".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
        Err(e) => eprintln!("Journal logging unavailable: {}", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(BoardConfig::default_path);
    let config = BoardConfig::load(&config_path);
    init_logging(&config);

    config.ensure_dirs()?;
    let store = FileStore::open(config.store_path())?;
    let board = MemoBoard::open(store, &config);

    println!("=== Memo board ({}) ===\n", config.store_path().display());

    for summary in board.group_summaries() {
        let marker = if summary.active { "*" } else { " " };
        let lock = if summary.locked { " [locked]" } else { "" };
        println!(
            "{} {} ({} memos, {}){}",
            marker, summary.name, summary.memo_count, summary.color, lock
        );
        for memo in board.list_memos(&summary.name) {
            println!(
                "    {} {} [{}]",
                memo.created.format("%Y-%m-%d %H:%M"),
                memo.title,
                memo.color
            );
        }
    }

    let total: usize = board.group_summaries().iter().map(|s| s.memo_count).sum();
    log::info!("board_check listed {} memos", total);
    println!("\n{} memos total", total);
    Ok(())
}
