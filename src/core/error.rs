// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、IoError, TableError, CleaningError, DatabaseError を定義します。

use thiserror::Error;

/// I/Oエラー
///
/// ファイル操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// ファイルパス
        path: String,
    },

    /// File read error
    #[error("Failed to read file: {path} (cause: {cause})")]
    FileRead {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// File write error
    #[error("Failed to write file: {path} (cause: {cause})")]
    FileWrite {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// Directory creation error
    #[error("Failed to create directory: {path} (cause: {cause})")]
    DirectoryCreate {
        /// ディレクトリパス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl IoError {
    /// ファイルが見つからないエラーかどうか
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, IoError::FileNotFound { .. })
    }

    /// ファイル読み込みエラーかどうか
    pub fn is_file_read(&self) -> bool {
        matches!(self, IoError::FileRead { .. })
    }

    /// ファイル書き込みエラーかどうか
    pub fn is_file_write(&self) -> bool {
        matches!(self, IoError::FileWrite { .. })
    }

    /// ディレクトリ作成エラーかどうか
    pub fn is_directory_create(&self) -> bool {
        matches!(self, IoError::DirectoryCreate { .. })
    }
}

/// テーブルエラー
///
/// 列指向テーブル（CSV / Parquet）の符号化・復号時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum TableError {
    /// I/O error
    #[error(transparent)]
    Io(#[from] IoError),

    /// Decode error (CSV / Parquet -> table)
    #[error("Failed to decode table: {path} (cause: {cause})")]
    Decode {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },

    /// Encode error (table -> Parquet)
    #[error("Failed to encode table: {path} (cause: {cause})")]
    Encode {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl TableError {
    /// 入力ファイルが存在しないエラーかどうか
    pub fn is_missing_input(&self) -> bool {
        matches!(self, TableError::Io(io) if io.is_file_not_found())
    }

    /// 復号エラーかどうか
    pub fn is_decode(&self) -> bool {
        matches!(self, TableError::Decode { .. })
    }

    /// 符号化エラーかどうか
    pub fn is_encode(&self) -> bool {
        matches!(self, TableError::Encode { .. })
    }
}

/// 正規化エラー
///
/// 不正な値はnull・false・検証タグに縮退するため、ここに現れるのは
/// テーブル構造そのものを組み立てられなかった場合のみです。
#[derive(Debug, Error)]
pub enum CleaningError {
    /// Table assembly error
    #[error("Failed to assemble cleaned table '{entity}': {cause}")]
    Assembly {
        /// エンティティ名
        entity: String,
        /// エラー原因
        cause: String,
    },
}

/// データベースエラー
///
/// データベース操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Transaction error
    #[error("Transaction error: {message}")]
    Transaction {
        /// エラーメッセージ
        message: String,
    },

    /// Unsupported column error
    #[error("Unsupported column '{column}' in table '{table}': {reason}")]
    UnsupportedColumn {
        /// テーブル名
        table: String,
        /// カラム名
        column: String,
        /// 理由
        reason: String,
    },
}

impl DatabaseError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, DatabaseError::Query { .. })
    }

    /// トランザクションエラーかどうか
    pub fn is_transaction(&self) -> bool {
        matches!(self, DatabaseError::Transaction { .. })
    }

    /// 非対応カラムエラーかどうか
    pub fn is_unsupported_column(&self) -> bool {
        matches!(self, DatabaseError::UnsupportedColumn { .. })
    }
}
