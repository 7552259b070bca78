use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::error::{ClientError, LocalError};

/// User-visible outcome of the last sync, import or export action.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Loading,
    Saved { at: DateTime<Local> },
    Loaded { at: DateTime<Local> },
    Imported { source: String },
    Exported { path: PathBuf },
    NoSyncId,
    NotFound(String),
    BadResponse(String),
    CommunicationFailure(String),
    Rejected(String),
    ImportFailed(String),
    ExportFailed(String),
}

impl SyncStatus {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SyncStatus::NoSyncId
                | SyncStatus::NotFound(_)
                | SyncStatus::BadResponse(_)
                | SyncStatus::CommunicationFailure(_)
                | SyncStatus::Rejected(_)
                | SyncStatus::ImportFailed(_)
                | SyncStatus::ExportFailed(_)
        )
    }

    pub fn import_failed(err: &LocalError) -> Self {
        SyncStatus::ImportFailed(err.to_string())
    }
}

impl From<ClientError> for SyncStatus {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(message) => SyncStatus::NotFound(message),
            ClientError::BadResponse(message) => SyncStatus::BadResponse(message),
            ClientError::Transport(e) => SyncStatus::CommunicationFailure(e.to_string()),
            ClientError::InvalidUrl(url) => {
                SyncStatus::CommunicationFailure(format!("invalid server url {}", url))
            }
            ClientError::Rejected { status, message } => {
                SyncStatus::Rejected(format!("{} ({})", message, status))
            }
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => Ok(()),
            SyncStatus::Syncing => write!(f, "同期中..."),
            SyncStatus::Loading => write!(f, "データ取得中..."),
            SyncStatus::Saved { at } => write!(f, "同期完了: {}", at.format("%H:%M:%S")),
            SyncStatus::Loaded { at } => write!(f, "読み込み完了: {}", at.format("%H:%M:%S")),
            SyncStatus::Imported { source } => write!(f, "インポート完了: {}", source),
            SyncStatus::Exported { path } => write!(f, "エクスポート完了: {}", path.display()),
            SyncStatus::NoSyncId => write!(f, "エラー: 同期IDがありません。先にサーバーへ保存するか、同期IDを入力してください"),
            SyncStatus::NotFound(message) => {
                write!(f, "エラー: データが見つかりません ({})。同期IDを確認してください", message)
            }
            SyncStatus::BadResponse(message) => {
                write!(f, "エラー: サーバーの応答が不正です ({})", message)
            }
            SyncStatus::CommunicationFailure(message) => {
                write!(f, "エラー: サーバーとの通信に失敗しました ({})", message)
            }
            SyncStatus::Rejected(message) => write!(f, "エラー: {}", message),
            SyncStatus::ImportFailed(message) => {
                write!(f, "エラー: ファイルの解析に失敗しました ({})", message)
            }
            SyncStatus::ExportFailed(message) => {
                write!(f, "エラー: エクスポートに失敗しました ({})", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_japanese() {
        let at = Local::now();

        assert_eq!(SyncStatus::Idle.to_string(), "");
        assert_eq!(SyncStatus::Syncing.to_string(), "同期中...");
        assert!(SyncStatus::Saved { at }.to_string().starts_with("同期完了: "));
        assert!(SyncStatus::Loaded { at }.to_string().starts_with("読み込み完了: "));
        assert_eq!(
            SyncStatus::Imported { source: "a.json".to_string() }.to_string(),
            "インポート完了: a.json"
        );
        assert!(SyncStatus::ImportFailed("x".to_string()).to_string().contains("ファイルの解析に失敗しました"));
    }

    #[test]
    fn every_error_message_is_prefixed() {
        let errors = [
            SyncStatus::NoSyncId,
            SyncStatus::NotFound("id".to_string()),
            SyncStatus::BadResponse("x".to_string()),
            SyncStatus::CommunicationFailure("x".to_string()),
            SyncStatus::Rejected("x".to_string()),
            SyncStatus::ImportFailed("x".to_string()),
            SyncStatus::ExportFailed("x".to_string()),
        ];

        for status in errors {
            assert!(status.is_error());
            assert!(status.to_string().starts_with("エラー: "), "{}", status);
        }
    }
}
