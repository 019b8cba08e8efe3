//! SQL text emission for condition trees.
//!
//! Comparisons emit a placeholder, IN / NOT IN lists are inlined as literals,
//! null checks and raw fragments emit no placeholder of their own (raw `?`
//! markers are renumbered for numbered dialects).
//!
//! # Inline literals
//!
//! IN lists are the one path that writes values straight into the SQL text.
//! String literals there go through [`defuse`], which only blanks out `drop`
//! and `;`, and get their single quotes doubled. This is NOT a general SQL
//! escaper. Prefer placeholder-bound comparisons for untrusted input.

use crate::ast::{BuildingBlock, Conjunction, Predicate, Value};
use crate::error::{SqliError, SqliResult};
use crate::transpiler::{DEFAULT_MAX_DEPTH, Dialect, check_depth, membership_items};

/// Blank out `drop` and `;` (case-sensitive), each replaced by one space.
pub fn defuse(text: &str) -> String {
    text.replace("drop", " ").replace(';', " ")
}

/// Quote a string for inline rendering: defused, quotes doubled.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", defuse(text).replace('\'', "''"))
}

/// How an IN list renders its elements, chosen once from its first non-null element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    /// Quoted and defused; blank elements dropped.
    Text,
    /// Symbolic names, quoted and defused like text.
    Enum,
    /// Natural text form, unquoted.
    Plain,
}

impl LiteralKind {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Date(_) => Some(Self::Text),
            Value::Enum { .. } => Some(Self::Enum),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Some(Self::Plain),
            Value::Null | Value::Array(_) => None,
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Enum, Value::String(_)) => true,
            (kind, v) => Self::of(v) == Some(kind),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Enum => "enum",
            Self::Plain => "numeric",
        }
    }

    fn render(self, value: &Value) -> Option<String> {
        match (self, value) {
            (_, Value::Null) => None,
            (Self::Text, v) => {
                let text = v.to_string();
                if text.trim().is_empty() {
                    None
                } else {
                    Some(quote_literal(&text))
                }
            }
            // enum names are caller data too
            (Self::Enum, Value::String(name)) | (Self::Enum, Value::Enum { name }) => {
                Some(quote_literal(name))
            }
            (Self::Enum, v) => Some(quote_literal(&v.to_string())),
            (Self::Plain, v) => Some(v.to_string()),
        }
    }
}

/// Render an IN list as `( a, b )`; `( )` when every element was skipped.
pub fn render_in_list(key: &str, items: &[Value]) -> SqliResult<String> {
    let Some(first) = items.iter().find(|v| !v.is_null()) else {
        return Ok("( )".to_string());
    };
    let kind = LiteralKind::of(first).ok_or_else(|| SqliError::MixedMembership {
        key: key.to_string(),
        expected: "scalar",
        found: first.kind_name(),
    })?;

    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        if !kind.accepts(item) {
            return Err(SqliError::MixedMembership {
                key: key.to_string(),
                expected: kind.label(),
                found: item.kind_name(),
            });
        }
        rendered.extend(kind.render(item));
    }

    if rendered.is_empty() {
        Ok("( )".to_string())
    } else {
        Ok(format!("( {} )", rendered.join(", ")))
    }
}

/// Accumulates SQL text and numbers placeholders in emission order.
#[derive(Debug)]
pub struct SqlWriter {
    pub sql: String,
    /// Placeholders emitted so far.
    pub placeholders: usize,
    dialect: Dialect,
    max_depth: usize,
}

impl SqlWriter {
    pub fn new(dialect: Dialect, max_depth: usize) -> Self {
        Self {
            sql: String::new(),
            placeholders: 0,
            dialect,
            max_depth,
        }
    }

    /// Write `blocks` as one condition list. Stored conjunctions are kept,
    /// the root list included.
    pub fn write(&mut self, blocks: &[BuildingBlock]) -> SqliResult<()> {
        self.write_level(blocks, 0, false)
    }

    fn write_level(&mut self, blocks: &[BuildingBlock], depth: usize, leading: bool) -> SqliResult<()> {
        check_depth(depth, self.max_depth)?;

        let mut leading = leading;
        for block in blocks {
            if block.predicate == Predicate::Sub && block.sub_list.is_empty() {
                continue;
            }
            let conjunction = if leading {
                Conjunction::None
            } else {
                block.conjunction
            };
            leading = false;
            self.write_block(block, conjunction, depth)?;
        }
        Ok(())
    }

    fn write_block(&mut self, block: &BuildingBlock, conjunction: Conjunction, depth: usize) -> SqliResult<()> {
        self.token(conjunction.sql_symbol());

        match block.predicate {
            Predicate::Sub => {
                self.token("(");
                self.write_level(&block.sub_list, depth + 1, true)?;
                self.token(")");
            }
            Predicate::X => {
                let fragment = self.renumber(&block.key.to_string());
                self.token(&fragment);
            }
            Predicate::IsNull | Predicate::IsNotNull => {
                self.token(&block.key.to_string());
                self.token(block.predicate.sql_symbol());
            }
            Predicate::In | Predicate::NotIn => {
                let key = block.key.to_string();
                let list = render_in_list(&key, membership_items(block)?)?;
                self.token(&key);
                self.token(block.predicate.sql_symbol());
                self.token(&list);
            }
            Predicate::Eq
            | Predicate::Ne
            | Predicate::Gt
            | Predicate::Gte
            | Predicate::Lt
            | Predicate::Lte => {
                self.token(&block.key.to_string());
                self.token(block.predicate.sql_symbol());
                if !block.value.is_null() {
                    let placeholder = self.next_placeholder();
                    self.token(&placeholder);
                }
            }
        }
        Ok(())
    }

    fn token(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        if !self.sql.is_empty() {
            self.sql.push(' ');
        }
        self.sql.push_str(token);
    }

    fn next_placeholder(&mut self) -> String {
        self.placeholders += 1;
        self.dialect.placeholder(self.placeholders)
    }

    /// Replace each `?` in a raw fragment with the dialect's next placeholder.
    fn renumber(&mut self, fragment: &str) -> String {
        let mut out = String::with_capacity(fragment.len());
        for c in fragment.chars() {
            if c == '?' {
                let placeholder = self.next_placeholder();
                out.push_str(&placeholder);
            } else {
                out.push(c);
            }
        }
        out.trim().to_string()
    }
}

/// Render `blocks` as SQL condition text.
pub fn build_condition_sql(blocks: &[BuildingBlock], dialect: Dialect) -> SqliResult<String> {
    let mut writer = SqlWriter::new(dialect, DEFAULT_MAX_DEPTH);
    writer.write(blocks)?;
    Ok(writer.sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defuse() {
        assert_eq!(defuse("b;drop"), "b  ");
        assert_eq!(defuse("DROP"), "DROP");
        assert_eq!(defuse("x; drop table t"), "x    table t");
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_render_strings() {
        let items = [Value::from("a"), Value::from("b;drop"), Value::from("c")];
        assert_eq!(render_in_list("k", &items).unwrap(), "( 'a', 'b  ', 'c' )");
    }

    #[test]
    fn test_render_skips_blank_and_null() {
        let items = [Value::from("a"), Value::from("  "), Value::Null, Value::from("d")];
        assert_eq!(render_in_list("k", &items).unwrap(), "( 'a', 'd' )");
        assert_eq!(render_in_list("k", &[Value::from("")]).unwrap(), "( )");
        assert_eq!(render_in_list("k", &[Value::Null, Value::Null]).unwrap(), "( )");
    }

    #[test]
    fn test_render_enums_accept_strings() {
        let items = [Value::enumeration("ACTIVE"), Value::from("CLOSED"), Value::Null];
        assert_eq!(render_in_list("k", &items).unwrap(), "( 'ACTIVE', 'CLOSED' )");
    }

    #[test]
    fn test_render_enum_names_defused() {
        let items = [
            Value::enumeration("A"),
            Value::enumeration("x'); drop table t;--"),
        ];
        let list = render_in_list("status", &items).unwrap();
        assert_eq!(list, "( 'A', 'x'')    table t --' )");
        assert!(!list.contains("drop") && !list.contains(';'));
    }

    #[test]
    fn test_render_numbers_unquoted() {
        let items = [Value::Int(1), Value::Null, Value::Float(2.5), Value::Bool(true)];
        assert_eq!(render_in_list("k", &items).unwrap(), "( 1, 2.5, true )");
    }

    #[test]
    fn test_render_rejects_mixed() {
        let items = [Value::Int(1), Value::from("1; drop")];
        let err = render_in_list("id", &items).unwrap_err();
        assert!(matches!(
            err,
            SqliError::MixedMembership { expected: "numeric", found: "string", .. }
        ));

        let items = [Value::from(vec![1])];
        assert!(render_in_list("id", &items).is_err());
    }

    #[test]
    fn test_raw_fragments_renumbered_for_postgres() {
        let mut writer = SqlWriter::new(Dialect::Postgres, DEFAULT_MAX_DEPTH);
        let blocks = vec![
            crate::ast::builders::eq("a", 1).unwrap(),
            crate::ast::builders::raw("b = ? OR c = ?", [2, 3]).and(),
        ];
        writer.write(&blocks).unwrap();
        assert_eq!(writer.sql, "a = $1 AND b = $2 OR c = $3");
        assert_eq!(writer.placeholders, 3);
    }
}
