// エンティティ別の正規化ルール
//
// 行の削除・並べ替えは行わず、型の統一・フラグの導出・検証タグ付けのみを行います。

use super::coercion::{derive_flag, issue_tags, to_datetime, to_numeric};
use super::table_edit::TableEdit;
use crate::core::entity::Entity;
use crate::core::error::CleaningError;
use crate::core::naming::{issue_column_name, BAD_FORMAT_LABEL};
use arrow::array::{ArrayRef, AsArray, BooleanArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// VIP判定の残高しきい値（これを超えるとVIP）
pub const VIP_THRESHOLD: f64 = 10_000.0;

/// ブロック状態の取得元カラム（優先順）
pub const BLOCKED_CANDIDATES: [&str; 4] = ["is_blocked", "blocked", "card_status", "status"];

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("phone pattern is valid"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is valid"));

/// 検証対象カラムに `<column>_issue` を付ける
fn flag_issues(edit: &mut TableEdit, column: &str, pattern: &Regex) {
    let tags = issue_tags(edit.column(column), edit.num_rows(), pattern, BAD_FORMAT_LABEL);
    edit.set_column(&issue_column_name(column), tags, true);
}

/// users: 作成日時・残高の型変換、VIPフラグ、電話番号とメールの形式検証
pub fn normalize_users(table: &RecordBatch) -> Result<RecordBatch, CleaningError> {
    let mut edit = TableEdit::new(table);

    edit.convert("created_at", to_datetime);
    edit.convert("total_balance", to_numeric);

    let is_vip = derive_flag(edit.column("total_balance"), edit.num_rows(), |balance| {
        balance > VIP_THRESHOLD
    });
    edit.set_column("is_vip", is_vip, false);

    flag_issues(&mut edit, "phone_number", &PHONE_PATTERN);
    flag_issues(&mut edit, "email", &EMAIL_PATTERN);

    edit.finish(Entity::Users)
}

/// cards: 金額の型変換とブロック状態の統一
pub fn normalize_cards(table: &RecordBatch) -> Result<RecordBatch, CleaningError> {
    let mut edit = TableEdit::new(table);

    for column in ["balance", "limit_amount"] {
        edit.convert(column, to_numeric);
    }

    let is_blocked = match edit.first_present(&BLOCKED_CANDIDATES) {
        Some(source) => edit
            .column(source)
            .map(blocked_flags)
            .unwrap_or_else(|| all_false(edit.num_rows())),
        // 取得元が無ければ全カードを有効（非ブロック）とみなす
        None => all_false(edit.num_rows()),
    };
    edit.set_column("is_blocked", is_blocked, false);

    edit.finish(Entity::Cards)
}

/// transactions: 金額・作成日時の型変換、負の金額のフラグ
pub fn normalize_transactions(table: &RecordBatch) -> Result<RecordBatch, CleaningError> {
    let mut edit = TableEdit::new(table);

    edit.convert("amount", to_numeric);
    edit.convert("created_at", to_datetime);

    let is_flagged = derive_flag(edit.column("amount"), edit.num_rows(), |amount| amount < 0.0);
    edit.set_column("is_flagged", is_flagged, false);

    edit.finish(Entity::Transactions)
}

/// logs / reports / scheduled_payments: 変更なし
pub fn passthrough(table: &RecordBatch) -> Result<RecordBatch, CleaningError> {
    Ok(table.clone())
}

/// 既知のトークンをブロック状態へ対応付け
pub fn map_blocked_token(token: &str) -> Option<bool> {
    match token {
        "1" | "true" | "blocked" => Some(true),
        "0" | "false" | "active" => Some(false),
        _ => None,
    }
}

/// 任意の型のカラムを小文字文字列として比較し、ブロック状態へ変換
///
/// 未知のトークンとnullはfalse（非ブロック）になります。
fn blocked_flags(source: &ArrayRef) -> ArrayRef {
    let Ok(strings) = cast(source, &DataType::Utf8) else {
        return all_false(source.len());
    };

    let flags: Vec<bool> = strings
        .as_string::<i32>()
        .iter()
        .map(|value| {
            value
                .map(|token| token.to_lowercase())
                .and_then(|token| map_blocked_token(&token))
                .unwrap_or(false)
        })
        .collect();
    Arc::new(BooleanArray::from(flags))
}

fn all_false(num_rows: usize) -> ArrayRef {
    Arc::new(BooleanArray::from(vec![false; num_rows]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_blocked_token() {
        assert_eq!(map_blocked_token("blocked"), Some(true));
        assert_eq!(map_blocked_token("1"), Some(true));
        assert_eq!(map_blocked_token("active"), Some(false));
        assert_eq!(map_blocked_token("0"), Some(false));
        assert_eq!(map_blocked_token("suspended"), None);
        // 呼び出し側で小文字化してから渡す
        assert_eq!(map_blocked_token("BLOCKED"), None);
    }

    #[test]
    fn test_patterns() {
        assert!(PHONE_PATTERN.is_match("+15551234567"));
        assert!(PHONE_PATTERN.is_match("123456789"));
        assert!(!PHONE_PATTERN.is_match("12345678"));
        assert!(!PHONE_PATTERN.is_match("+1234567890123456"));
        assert!(!PHONE_PATTERN.is_match("abc"));

        assert!(EMAIL_PATTERN.is_match("a@b.com"));
        assert!(!EMAIL_PATTERN.is_match("x"));
        assert!(!EMAIL_PATTERN.is_match("a@b"));
        assert!(!EMAIL_PATTERN.is_match("a@@b.com"));
    }
}
