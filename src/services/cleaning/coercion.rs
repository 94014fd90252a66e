// 型変換と検証の基本操作
//
// どの関数も不正な値で失敗せず、null・false・検証タグへ縮退させます。
// 入力と出力の行数は常に一致します。

use arrow::array::{new_null_array, Array, ArrayRef, AsArray, BooleanArray, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, TimeUnit};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::Arc;

/// 正規化後の日時型
pub const TIMESTAMP_TYPE: DataType = DataType::Timestamp(TimeUnit::Microsecond, None);

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// 文字列系の配列をUtf8として取り出す
fn as_utf8(array: &ArrayRef) -> Option<ArrayRef> {
    match array.data_type() {
        DataType::Utf8 => Some(array.clone()),
        DataType::LargeUtf8 => cast(array, &DataType::Utf8).ok(),
        _ => None,
    }
}

/// 数値へ変換（失敗した値はnull）
///
/// 既にFloat64であればそのまま返すため、何度適用しても結果は変わりません。
pub fn to_numeric(array: &ArrayRef) -> ArrayRef {
    if array.data_type() == &DataType::Float64 {
        return array.clone();
    }

    match as_utf8(array) {
        Some(strings) => {
            let parsed: Float64Array = strings
                .as_string::<i32>()
                .iter()
                .map(|value| value.and_then(parse_number))
                .collect();
            Arc::new(parsed)
        }
        None => cast(array, &DataType::Float64)
            .unwrap_or_else(|_| new_null_array(&DataType::Float64, array.len())),
    }
}

/// 1つの文字列を数値として解釈（NaNと無限大はnull）
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// 日時へ変換（失敗した値はnull）
pub fn to_datetime(array: &ArrayRef) -> ArrayRef {
    if array.data_type() == &TIMESTAMP_TYPE {
        return array.clone();
    }

    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let parsed: TimestampMicrosecondArray = as_utf8(array)
                .map(|strings| {
                    strings
                        .as_string::<i32>()
                        .iter()
                        .map(|value| value.and_then(parse_timestamp_micros))
                        .collect()
                })
                .unwrap_or_else(|| vec![None; array.len()].into());
            Arc::new(parsed)
        }
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => {
            cast(array, &TIMESTAMP_TYPE).unwrap_or_else(|_| new_null_array(&TIMESTAMP_TYPE, array.len()))
        }
        _ => new_null_array(&TIMESTAMP_TYPE, array.len()),
    }
}

/// 1つの文字列をUNIXエポックからのマイクロ秒として解釈
///
/// オフセット付きの値はUTCへ換算し、日付のみの値は0時とします。
pub fn parse_timestamp_micros(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.timestamp_micros());
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_micros());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc().timestamp_micros());
        }
    }

    None
}

/// 数値カラムから真偽値フラグを導出
///
/// null（およびカラム自体が無い場合）は常にfalseになります。
pub fn derive_flag<F>(numbers: Option<&ArrayRef>, num_rows: usize, predicate: F) -> ArrayRef
where
    F: Fn(f64) -> bool,
{
    let flags: Vec<bool> = match numbers.and_then(|array| array.as_primitive_opt::<Float64Type>()) {
        Some(values) => values
            .iter()
            .map(|value| value.is_some_and(|v| predicate(v)))
            .collect(),
        None => vec![false; num_rows],
    };
    Arc::new(BooleanArray::from(flags))
}

/// 形式検証に失敗した行だけにラベルを立てた疎なカラムを作る
///
/// 欠損値・空文字は失敗として扱います。カラム自体が無い場合は全行が欠損です。
pub fn issue_tags(values: Option<&ArrayRef>, num_rows: usize, pattern: &Regex, label: &str) -> ArrayRef {
    let strings = values.and_then(|array| {
        as_utf8(array).or_else(|| cast(array, &DataType::Utf8).ok())
    });

    let tags: StringArray = match strings {
        Some(strings) => strings
            .as_string::<i32>()
            .iter()
            .map(|value| (!pattern.is_match(value.unwrap_or(""))).then_some(label))
            .collect(),
        None => vec![Some(label); num_rows].into(),
    };
    Arc::new(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;

    fn strings(values: Vec<Option<&str>>) -> ArrayRef {
        Arc::new(StringArray::from(values))
    }

    #[test]
    fn test_to_numeric_degrades_to_null() {
        let result = to_numeric(&strings(vec![Some("15000"), Some(" -5.00 "), Some("bad"), Some(""), None]));
        let numbers = result.as_primitive::<Float64Type>();

        assert_eq!(numbers.len(), 5);
        assert_eq!(numbers.value(0), 15000.0);
        assert_eq!(numbers.value(1), -5.0);
        assert!(numbers.is_null(2));
        assert!(numbers.is_null(3));
        assert!(numbers.is_null(4));
    }

    #[test]
    fn test_to_numeric_widens_integers() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![Some(3), None]));
        let result = to_numeric(&ints);

        assert_eq!(result.data_type(), &DataType::Float64);
        assert_eq!(result.as_primitive::<Float64Type>().value(0), 3.0);
        assert!(result.is_null(1));
    }

    #[test]
    fn test_to_numeric_nan_is_null() {
        let result = to_numeric(&strings(vec![Some("NaN")]));
        assert!(result.is_null(0));
    }

    #[test]
    fn test_to_numeric_infinity_is_null() {
        let result = to_numeric(&strings(vec![Some("inf"), Some("-Infinity"), Some("1e3")]));
        let numbers = result.as_primitive::<Float64Type>();

        assert!(numbers.is_null(0));
        assert!(numbers.is_null(1));
        assert_eq!(numbers.value(2), 1000.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = parse_timestamp_micros("2024-03-01").unwrap();
        assert_eq!(parse_timestamp_micros("2024-03-01 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp_micros("2024-03-01T00:00:00.000"), Some(midnight));
        assert_eq!(parse_timestamp_micros("03/01/2024"), Some(midnight));
        assert_eq!(parse_timestamp_micros("2024-03-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(
            parse_timestamp_micros("2024-03-01 00:00:01.5"),
            Some(midnight + 1_500_000)
        );
        assert_eq!(parse_timestamp_micros("yesterday"), None);
        assert_eq!(parse_timestamp_micros("  "), None);
    }

    #[test]
    fn test_to_datetime_is_stable() {
        let once = to_datetime(&strings(vec![Some("2024-03-01"), Some("garbage")]));
        assert_eq!(once.data_type(), &TIMESTAMP_TYPE);
        assert!(once.is_valid(0));
        assert!(once.is_null(1));

        let twice = to_datetime(&once);
        assert_eq!(once.to_data(), twice.to_data());
    }

    #[test]
    fn test_to_datetime_unsupported_type_is_null() {
        let flags: ArrayRef = Arc::new(BooleanArray::from(vec![true, false]));
        let result = to_datetime(&flags);
        assert_eq!(result.null_count(), 2);
    }

    #[test]
    fn test_derive_flag_null_is_false() {
        let numbers: ArrayRef = Arc::new(Float64Array::from(vec![Some(-1.0), None, Some(2.0)]));
        let flags = derive_flag(Some(&numbers), 3, |v| v < 0.0);
        let flags = flags.as_boolean();

        assert!(flags.value(0));
        assert!(!flags.value(1));
        assert!(!flags.value(2));
        assert_eq!(flags.null_count(), 0);
    }

    #[test]
    fn test_derive_flag_missing_column() {
        let flags = derive_flag(None, 2, |v| v > 0.0);
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.as_boolean().true_count(), 0);
    }

    #[test]
    fn test_issue_tags_sparse() {
        let pattern = Regex::new(r"^[0-9]+$").unwrap();
        let tags = issue_tags(
            Some(&strings(vec![Some("123"), Some("12a"), None, Some("")])),
            4,
            &pattern,
            "bad_format",
        );
        let tags = tags.as_string::<i32>();

        assert!(tags.is_null(0));
        assert_eq!(tags.value(1), "bad_format");
        assert_eq!(tags.value(2), "bad_format");
        assert_eq!(tags.value(3), "bad_format");
    }

    #[test]
    fn test_issue_tags_missing_column_tags_every_row() {
        let pattern = Regex::new(r"^x$").unwrap();
        let tags = issue_tags(None, 3, &pattern, "bad_format");
        assert_eq!(tags.null_count(), 0);
        assert_eq!(tags.len(), 3);
    }
}
