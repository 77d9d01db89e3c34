//! Error handling for the remediation workflow
//!
//! This module provides the error taxonomy for the authenticate → list →
//! select → remediate pipeline, using the thiserror crate for ergonomic
//! error handling.

use thiserror::Error;

/// Main error type for remediation operations
#[derive(Error, Debug)]
pub enum RemediateError {
    // Configuration errors
    #[error("環境変数 {name} が設定されていません")]
    MissingEnv { name: String },

    #[error("TOTPシークレットの形式が不正です: {message}")]
    InvalidTotpSecret { message: String },

    // Authentication errors
    #[error("認証に失敗しました（HTTP {status}）")]
    AuthenticationFailed { status: u16 },

    #[error("トークンレスポンスの処理に失敗しました: {message}")]
    AuthResponseMalformed { message: String },

    // Listing errors
    #[error("プロジェクト一覧の取得に失敗しました（HTTP {status}）")]
    ListingFailed { status: u16 },

    #[error("プロジェクト一覧レスポンスの処理に失敗しました: {message}")]
    ListingResponseMalformed { message: String },

    // Selection errors
    #[error("プロジェクト選択の入力読み取りに失敗しました: {message}")]
    SelectionFailed { message: String },

    // Per-project remediation errors
    #[error("[{project}] プロジェクトIDに使用できない文字が含まれています")]
    InvalidProjectId { project: String },

    #[error("[{project}] リポジトリのクローンに失敗しました: {message}")]
    CloneFailed { project: String, message: String },

    #[error("[{project}] {dir} での脆弱性修正に失敗しました: {message}")]
    FixFailed {
        project: String,
        dir: String,
        message: String,
    },

    #[error("[{project}] 修正結果のコミット/プッシュに失敗しました: {message}")]
    PublishFailed { project: String, message: String },
}

impl RemediateError {
    /// Get the project identifier associated with this error, if any
    pub fn project(&self) -> Option<&str> {
        match self {
            Self::InvalidProjectId { project }
            | Self::CloneFailed { project, .. }
            | Self::FixFailed { project, .. }
            | Self::PublishFailed { project, .. } => Some(project),
            _ => None,
        }
    }

    /// Check if this error aborts the entire run.
    ///
    /// Non-fatal errors abort at most the current project's remediation
    /// (or a single manifest directory's fix step).
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidProjectId { .. }
                | Self::CloneFailed { .. }
                | Self::FixFailed { .. }
                | Self::PublishFailed { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::MissingEnv { .. } => vec![
                ".envファイルまたは環境変数を設定してください",
                "必要な変数: AUTH_CLIENT, AUTH_SECRET, AUTH_USER, AUTH_PASS, TOTP_SECRET",
            ],
            Self::InvalidTotpSecret { .. } => {
                vec!["TOTP_SECRETにはbase32エンコードされた共有シークレットを指定してください"]
            }
            Self::AuthenticationFailed { .. } => vec![
                "認証情報を確認してください",
                "ワンタイムパスコードの有効期限切れの可能性があります。再実行してください",
            ],
            Self::AuthResponseMalformed { .. } => vec![
                "ネットワーク接続を確認してください",
                "認証エンドポイントのステータスを確認してください",
            ],
            Self::ListingFailed { .. } => vec![
                "アクセストークンのスコープを確認してください",
                "APIのステータスを確認してください",
            ],
            Self::ListingResponseMalformed { .. } => {
                vec!["ネットワーク接続を確認してください"]
            }
            Self::SelectionFailed { .. } => {
                vec!["非対話モード（--non-interactive）での実行を検討してください"]
            }
            Self::InvalidProjectId { .. } => {
                vec!["プロジェクトIDは英数字、ドット、ハイフン、アンダースコアのみ使用可能です"]
            }
            Self::CloneFailed { .. } => vec![
                "リポジトリへのSSHアクセス権を確認してください",
                "リモートにブランチが存在するか確認してください",
            ],
            Self::FixFailed { .. } => vec![
                "npmの出力を確認してください",
                "対象ディレクトリで npm audit fix を手動実行してください",
            ],
            Self::PublishFailed { .. } => vec![
                "リモートへのプッシュ権限を確認してください",
                "対象プロジェクトの再実行が必要です",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingEnv { .. } => "CONFIG_MISSING_ENV",
            Self::InvalidTotpSecret { .. } => "CONFIG_INVALID_TOTP_SECRET",
            Self::AuthenticationFailed { .. } => "AUTH_FAILED",
            Self::AuthResponseMalformed { .. } => "AUTH_RESPONSE_MALFORMED",
            Self::ListingFailed { .. } => "LISTING_FAILED",
            Self::ListingResponseMalformed { .. } => "LISTING_RESPONSE_MALFORMED",
            Self::SelectionFailed { .. } => "SELECTION_FAILED",
            Self::InvalidProjectId { .. } => "INVALID_PROJECT_ID",
            Self::CloneFailed { .. } => "CLONE_FAILED",
            Self::FixFailed { .. } => "FIX_FAILED",
            Self::PublishFailed { .. } => "PUBLISH_FAILED",
        }
    }
}
