//! T-SQL fragments that guard and stamp a release bundle
//!
//! The header refuses to run unless the database holds the release the
//! bundle continues from (the exact recorded name when one was read, else
//! any release ending at the start commit); the footer records the new
//! release. Bundles
//! start with the sqlcmd `:on error exit` directive so a failing batch stops
//! the script before the footer runs.

use crate::domain::ReleaseTag;

/// Batch separator
pub const SEPARATOR: &str = "GO\n";

/// Quote a value as a T-SQL string literal
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote an identifier with brackets
pub fn sql_identifier(value: &str) -> String {
    format!("[{}]", value.replace(']', "]]"))
}

/// Switch to the target database
pub fn use_database(database: &str) -> String {
    format!("USE {}\n{}", sql_identifier(database), SEPARATOR)
}

/// Batch that aborts unless the database is at the bundle's start commit.
///
/// `recorded` is the bundle name read for the target database; when given,
/// the database must hold exactly that name.
pub fn guard(release_type: &str, tag: &ReleaseTag, recorded: Option<&str>) -> String {
    let name = tag.to_string();
    let mut out = String::new();

    out.push_str(&format!(
        "DECLARE @v_release_bundle VARCHAR(128) = {};\n",
        sql_literal(&name)
    ));
    out.push_str(&format!(
        "DECLARE @v_current_bundle VARCHAR(128) = release.fn_release_bundle({});\n",
        sql_literal(release_type)
    ));
    out.push_str(&format!(
        "IF @v_current_bundle = @v_release_bundle\n    THROW 51001, {}, 1;\n",
        sql_literal(&format!("Release bundle {} has already been applied", name))
    ));

    if let Some(expected) = recorded {
        out.push_str(&format!(
            "IF ISNULL(@v_current_bundle, '') <> {}\n    THROW 51000, {}, 1;\n",
            sql_literal(expected),
            sql_literal(&format!(
                "Release bundle {} expects the database to be at release {}",
                name, expected
            ))
        ));
    } else if tag.starts_at_root() {
        out.push_str(&format!(
            "IF @v_current_bundle IS NOT NULL\n    THROW 51000, {}, 1;\n",
            sql_literal(&format!(
                "Release bundle {} starts from the repository root but a release is already recorded",
                name
            ))
        ));
    } else {
        out.push_str(&format!(
            "IF @v_current_bundle IS NULL OR @v_current_bundle NOT LIKE {}\n    THROW 51000, {}, 1;\n",
            sql_literal(&format!("%-{}", tag.start)),
            sql_literal(&format!(
                "Release bundle {} expects the database to be at commit {}",
                name, tag.start
            ))
        ));
    }

    out.push_str(SEPARATOR);
    out
}

/// Batch that records the release on the database
pub fn record_release(release_type: &str, tag: &ReleaseTag, end_commit: &str) -> String {
    format!(
        "DECLARE @v_applied_at DATETIME2 = SYSUTCDATETIME();\n\
         EXEC release.pr_tag_release_bundle\n    \
         @i_release_type = {},\n    \
         @i_release_bundle = {},\n    \
         @i_release_commit = {},\n    \
         @i_applied_at = @v_applied_at;\n{}",
        sql_literal(release_type),
        sql_literal(&tag.to_string()),
        sql_literal(end_commit),
        SEPARATOR
    )
}

/// One source file with its marker comment
pub fn file_block(path: &str, content: &str) -> String {
    format!("--\n-- {}\n--\n{}{}", path, content, SEPARATOR)
}
