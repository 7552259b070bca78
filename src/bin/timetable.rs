//! Command-line client for the course timetable.
//!
//! ```bash
//! timetable add 1 mon 2 "線形代数" 2
//! timetable show --semester 1
//! timetable push
//! timetable pull --id 3f2b...
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable_sync::client::{HttpSyncClient, SyncOrchestrator, SyncStatus};
use timetable_sync::config::{ClientConfig, DEFAULT_API_URL, DEFAULT_DATA_DIR};
use timetable_sync::local::FileStorage;
use timetable_sync::models::{Course, Day, PERIODS, Period, Semester, SlotRef, Timetable, parse_period};

#[derive(Parser)]
#[command(name = "timetable")]
#[command(version, about = "学期ごとの履修登録を管理し、サーバーと同期する")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 同期サーバーのURL
    #[arg(long, global = true, env = "SYNC_API_URL", default_value = DEFAULT_API_URL)]
    server: String,

    /// ローカルキャッシュの保存先ディレクトリ
    #[arg(long, global = true, env = "TIMETABLE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// 学期の時間割を表示する
    Show {
        /// 学期名または番号 (1-8)
        #[arg(short, long, default_value = "1")]
        semester: Semester,
    },

    /// コマに科目を登録する (既存の科目は置き換え)
    Add {
        semester: Semester,
        day: Day,
        #[arg(value_parser = parse_period)]
        period: Period,
        name: String,
        credits: u32,
    },

    /// コマを空にする
    Remove {
        semester: Semester,
        day: Day,
        #[arg(value_parser = parse_period)]
        period: Period,
    },

    /// 2つのコマの内容を入れ替える
    Move {
        semester: Semester,
        from_day: Day,
        #[arg(value_parser = parse_period)]
        from_period: Period,
        to_day: Day,
        #[arg(value_parser = parse_period)]
        to_period: Period,
    },

    /// 学期ごとの単位数と総単位数を表示する
    Credits,

    /// 現在の同期IDを表示する
    Id,

    /// 時間割をサーバーに保存する
    Push,

    /// サーバーから時間割を読み込む
    Pull {
        /// 保存済みの同期IDの代わりに使う同期ID
        #[arg(long)]
        id: Option<String>,
    },

    /// 時間割をJSONファイルに書き出す
    Export {
        /// 出力先 (省略時は現在のディレクトリに日付入りの名前で保存)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// JSONファイルから時間割を読み込む
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "timetable_sync=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig {
        api_url: cli.server,
        data_dir: cli.data_dir,
    };

    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let api = Arc::new(HttpSyncClient::new(&config.api_url)?);
    let session = SyncOrchestrator::start(storage, api);

    let status = match cli.command {
        Commands::Show { semester } => {
            print_semester(&session.timetable(), semester);
            None
        }
        Commands::Add { semester, day, period, name, credits } => {
            let course = Course::new(&name, credits)?;
            session.place_course(semester, day, period, course);
            print_semester(&session.timetable(), semester);
            None
        }
        Commands::Remove { semester, day, period } => {
            session.remove_course(semester, day, period);
            print_semester(&session.timetable(), semester);
            None
        }
        Commands::Move { semester, from_day, from_period, to_day, to_period } => {
            session.move_course(
                semester,
                SlotRef::new(from_day, from_period),
                SlotRef::new(to_day, to_period),
            );
            print_semester(&session.timetable(), semester);
            None
        }
        Commands::Credits => {
            for (semester, credits) in session.credits_by_semester() {
                println!("{}: {}単位", semester, credits);
            }
            println!("総単位数: {}単位", session.total_credits());
            None
        }
        Commands::Id => {
            match session.sync_id() {
                Some(id) => println!("{}", id),
                None => println!("(同期IDはまだありません)"),
            }
            None
        }
        Commands::Push => Some(session.sync_to_server().await),
        Commands::Pull { id } => Some(session.restore_from_server(id.as_deref()).await),
        Commands::Export { out } => Some(match out {
            Some(path) => session.export_to_path(&path),
            None => session.export_to_dir(&std::env::current_dir()?, chrono::Local::now().date_naive()),
        }),
        Commands::Import { path } => Some(session.import_file(&path)),
    };

    if let Some(status) = status {
        report(&status, session.sync_id().as_deref());
        if status.is_error() {
            std::process::exit(1);
        }
    }

    Ok(())
}

fn report(status: &SyncStatus, sync_id: Option<&str>) {
    if status.is_error() {
        eprintln!("{}", status);
        return;
    }
    println!("{}", status);
    if let (SyncStatus::Saved { .. } | SyncStatus::Loaded { .. }, Some(id)) = (status, sync_id) {
        println!("同期ID: {}", id);
    }
}

fn print_semester(timetable: &Timetable, semester: Semester) {
    println!("{} ({}単位)", semester, timetable.credits_for_semester(semester));
    for period in PERIODS {
        let cells: Vec<String> = Day::ALL
            .iter()
            .map(|day| {
                let cell = timetable
                    .get(semester, *day, period)
                    .map(|course| format!("{}({})", course.name, course.credits))
                    .unwrap_or_else(|| "-".to_string());
                format!("{}: {}", day, cell)
            })
            .collect();
        println!("{}限 | {}", period, cells.join(" | "));
    }
}
