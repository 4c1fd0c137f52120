use dbver::common::MAIN_SCHEMA;
use dbver::errors::{DbverResult, ErrorKind};
use dbver::format::NamedFormat;
use dbver::migration::{Migrations, UpgradeOptions};
use dbver_int_test::test_util::{
    column_values, create_conn, create_conn_with_other_schema, table_names, OTHER_SCHEMA,
};

fn name(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn migrations() -> Migrations<NamedFormat> {
    let mut migrations = Migrations::new(NamedFormat::default(), 1);
    migrations.migrates(None, name("A"), |conn, schema| {
        conn.execute_batch(&format!("CREATE TABLE \"{}\".a (a INT PRIMARY KEY)", schema))?;
        Ok(())
    });
    migrations.migrates(None, name("B"), |conn, schema| {
        conn.execute_batch(&format!("CREATE TABLE \"{}\".b (b INT PRIMARY KEY)", schema))?;
        Ok(())
    });
    migrations.migrates(name("A"), name("B"), |conn, schema| {
        conn.execute_batch(&format!(
            "CREATE TABLE \"{0}\".b (b INT PRIMARY KEY);
             INSERT INTO \"{0}\".b SELECT * FROM \"{0}\".a;
             DROP TABLE \"{0}\".a",
            schema
        ))?;
        Ok(())
    });
    migrations.migrates(name("B"), name("A"), |conn, schema| {
        conn.execute_batch(&format!(
            "CREATE TABLE \"{0}\".a (a INT PRIMARY KEY);
             INSERT INTO \"{0}\".a SELECT * FROM \"{0}\".b;
             DROP TABLE \"{0}\".b",
            schema
        ))?;
        Ok(())
    });
    migrations
}

// ==================== Graph Tests ====================

#[test]
fn test_mapping() {
    let migrations = migrations();
    let graph = migrations.graph();
    let targets = |from: Option<String>| -> Vec<Option<String>> {
        graph
            .edges_from(&from)
            .map(|edges| edges.keys().cloned().collect())
            .unwrap_or_default()
    };

    assert_eq!(targets(None), vec![name("A"), name("B")]);
    assert_eq!(targets(name("A")), vec![name("B")]);
    assert_eq!(targets(name("B")), vec![name("A")]);
    assert!(graph.edges_from(&name("does not exist")).is_none());

    assert_eq!(graph.source_count(), 3);
    assert_eq!(
        graph.all_sources().cloned().collect::<Vec<_>>(),
        vec![None, name("A"), name("B")]
    );
}

// ==================== Format Tests ====================

#[test]
fn test_unprovisioned() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    let migrations = migrations();
    assert_eq!(migrations.get_format(&conn, MAIN_SCHEMA)?, None);
    assert_eq!(migrations.get_format(&conn, OTHER_SCHEMA)?, None);
    Ok(())
}

#[test]
fn test_invalid_application_id() -> DbverResult<()> {
    let conn = create_conn()?;
    conn.execute_batch("PRAGMA application_id = 2")?;
    let err = migrations().get_format(&conn, MAIN_SCHEMA).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::VersionError);
    Ok(())
}

#[test]
fn test_nonempty_db() -> DbverResult<()> {
    let conn = create_conn()?;
    conn.execute_batch("CREATE TABLE x (x INT PRIMARY KEY)")?;
    let err = migrations().get_format(&conn, MAIN_SCHEMA).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::VersionError);
    Ok(())
}

#[test]
fn test_custom_format_table() -> DbverResult<()> {
    let conn = create_conn()?;
    let migrations = Migrations::new(NamedFormat::with_table("schema_format")?, 1);
    migrations.set_format(&conn, MAIN_SCHEMA, &name("custom"))?;
    assert_eq!(table_names(&conn, MAIN_SCHEMA)?, vec!["schema_format"]);
    assert_eq!(migrations.get_format(&conn, MAIN_SCHEMA)?, name("custom"));
    Ok(())
}

// ==================== Migration Tests ====================

#[test]
fn test_provision_a() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    let migrations = migrations();

    migrations.apply(&conn, MAIN_SCHEMA, &None, &name("A"))?;
    assert_eq!(migrations.get_format(&conn, MAIN_SCHEMA)?, name("A"));
    conn.execute("INSERT INTO a (a) VALUES (?1)", [1])?;

    migrations.apply(&conn, OTHER_SCHEMA, &None, &name("A"))?;
    assert_eq!(migrations.get_format(&conn, OTHER_SCHEMA)?, name("A"));
    conn.execute("INSERT INTO \"other schema\".a (a) VALUES (?1)", [1])?;
    Ok(())
}

#[test]
fn test_migrate_a_b() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    let migrations = migrations();

    for schema in [MAIN_SCHEMA, OTHER_SCHEMA] {
        migrations.apply(&conn, schema, &None, &name("A"))?;
        conn.execute(&format!("INSERT INTO \"{}\".a (a) VALUES (?1)", schema), [1])?;
        migrations.apply(&conn, schema, &name("A"), &name("B"))?;
        assert_eq!(migrations.get_format(&conn, schema)?, name("B"));
        assert_eq!(column_values(&conn, schema, "b")?, vec![1]);
    }
    Ok(())
}

#[test]
fn test_migrate_b_a() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    let migrations = migrations();

    for schema in [MAIN_SCHEMA, OTHER_SCHEMA] {
        migrations.apply(&conn, schema, &None, &name("B"))?;
        conn.execute(&format!("INSERT INTO \"{}\".b (b) VALUES (?1)", schema), [1])?;
        migrations.apply(&conn, schema, &name("B"), &name("A"))?;
        assert_eq!(migrations.get_format(&conn, schema)?, name("A"));
        assert_eq!(column_values(&conn, schema, "a")?, vec![1]);
    }
    Ok(())
}

#[test]
fn test_upgrade_walks_until_edges_are_exhausted() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    let migrations = migrations();

    let format = migrations.upgrade(&conn, MAIN_SCHEMA, &UpgradeOptions::default())?;
    assert_eq!(format, name("B"));
    assert_eq!(migrations.get_format(&conn, MAIN_SCHEMA)?, name("B"));
    assert_eq!(table_names(&conn, MAIN_SCHEMA)?, vec!["b", "format"]);

    // attached schema is untouched
    assert_eq!(migrations.get_format(&conn, OTHER_SCHEMA)?, None);
    assert!(table_names(&conn, OTHER_SCHEMA)?.is_empty());
    Ok(())
}

#[test]
fn test_upgrade_condition_on_names() -> DbverResult<()> {
    let conn = create_conn()?;
    let migrations = migrations();
    let options = UpgradeOptions::new().condition(|_, to: &Option<String>| to.as_deref() == Some("A"));
    assert_eq!(migrations.upgrade(&conn, MAIN_SCHEMA, &options)?, name("A"));
    assert_eq!(table_names(&conn, MAIN_SCHEMA)?, vec!["a", "format"]);
    Ok(())
}
