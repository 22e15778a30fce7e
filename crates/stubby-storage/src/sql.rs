//! Statements and row decoding shared by the SQL engines.
//!
//! Both engines speak the same `url_list` layout and `?` placeholders, so the
//! statements live here once.

use crate::error::map_sqlx_error;
use sqlx::{ColumnIndex, Decode, Row, Type};
use stubby_core::error::{Result, StorageError};
use stubby_core::{Mapping, ShortCode};

/// `hash` is cast to a plain character string on the way out: MySQL marks
/// columns with a `_bin` collation as binary in result metadata, which
/// would not decode as text.
pub(crate) const FIND_BY_CODE: &str = r#"
    SELECT id, CAST(hash AS CHAR) AS hash, longurl
    FROM url_list
    WHERE hash = ?
    LIMIT 1
"#;

pub(crate) const MAX_ID: &str = "SELECT MAX(id) FROM url_list";

pub(crate) const INSERT: &str = r#"
    INSERT INTO url_list (id, hash, longurl)
    VALUES (?, ?, ?)
"#;

pub(crate) const INSERT_URL_ONLY: &str = "INSERT INTO url_list (hash, longurl) VALUES (NULL, ?)";

pub(crate) const SET_CODE: &str = "UPDATE url_list SET hash = ? WHERE id = ?";

/// Converts an identifier to the signed representation used by SQL columns.
pub(crate) fn id_to_sql(id: u64) -> Result<i64> {
    i64::try_from(id)
        .map_err(|_| StorageError::Operation(format!("identifier {id} exceeds the column width")))
}

pub(crate) fn id_from_sql(raw: i64) -> Result<u64> {
    u64::try_from(raw)
        .map_err(|_| StorageError::InvalidData(format!("negative identifier {raw} in url_list")))
}

/// Decodes a row selected with [`FIND_BY_CODE`].
pub(crate) fn read_mapping<'r, R>(row: &'r R) -> Result<Mapping>
where
    R: Row,
    &'static str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let hash: Option<String> = row.try_get("hash").map_err(map_sqlx_error)?;
    let url: String = row.try_get("longurl").map_err(map_sqlx_error)?;

    mapping_from_parts(id, hash, url)
}

/// Rebuilds a mapping from `url_list` columns, checking the stored code
/// against the identifier it must be derived from.
pub(crate) fn mapping_from_parts(id: i64, hash: Option<String>, url: String) -> Result<Mapping> {
    let id = id_from_sql(id)?;
    let hash = hash
        .ok_or_else(|| StorageError::InvalidData(format!("row {id} has no short code")))?;
    let code = ShortCode::parse(&hash).map_err(|e| {
        StorageError::InvalidData(format!("row {id} has malformed code '{hash}': {e}"))
    })?;

    let mapping = Mapping::new(id, url);
    if mapping.code != code {
        return Err(StorageError::InvalidData(format!(
            "row {id} stores code '{code}', expected '{}'",
            mapping.code
        )));
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_conversion_bounds() {
        assert_eq!(id_to_sql(i64::MAX as u64).unwrap(), i64::MAX);
        assert!(matches!(
            id_to_sql(u64::MAX),
            Err(StorageError::Operation(_))
        ));
        assert!(matches!(id_from_sql(-1), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn row_with_consistent_code() {
        let mapping = mapping_from_parts(1, Some("b".to_string()), "example.com/a".to_string())
            .unwrap();
        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.code.as_str(), "b");
        assert_eq!(mapping.url, "example.com/a");
    }

    #[test]
    fn row_with_mismatched_code_is_rejected() {
        let err = mapping_from_parts(2, Some("b".to_string()), "x".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[test]
    fn row_without_code_is_rejected() {
        let err = mapping_from_parts(2, None, "x".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }
}
