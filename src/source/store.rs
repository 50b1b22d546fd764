//! SQLite-backed source graph store.
//!
//! The whole graph is read into a [`SourceGraph`] before any transformation
//! starts; the transformation itself never touches the database.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use super::{
    CatalystActivity, PhysicalEntityKind, SourceEvent, SourceGraph, SourcePathway,
    SourcePhysicalEntity, SourceReaction, SourceSpecies, Summation,
};
use crate::db::{migrate, Db};
use crate::error::{BiopaxError, Result};

pub struct SourceStore {
    db: Db,
}

impl SourceStore {
    /// Open (creating if needed) a store and bring its schema up to date.
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db = Db::new(db_path);
        db.with_connection(migrate::run_migrations).await?;
        log::info!("Source store ready at {}", db.path().display());
        Ok(Self { db })
    }

    /// Read the full event hierarchy into memory.
    pub async fn load_graph(&self) -> Result<SourceGraph> {
        let graph = self.db.with_connection(|conn| read_graph(conn)).await?;
        log::info!(
            "Loaded source graph from {}: {} events",
            self.db.path().display(),
            graph.events().count()
        );
        Ok(graph)
    }

    /// Replace the store's content with `graph`.
    pub async fn save_graph(&self, graph: SourceGraph) -> Result<()> {
        self.db.with_connection(move |conn| write_graph(conn, &graph)).await
    }
}

fn grouped<T>(
    conn: &Connection,
    sql: &str,
    map: impl Fn(&rusqlite::Row<'_>) -> rusqlite::Result<(i64, T)>,
) -> Result<HashMap<i64, Vec<T>>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| map(row))?;
    let mut out: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        let (key, value) = row?;
        out.entry(key).or_default().push(value);
    }
    Ok(out)
}

fn read_graph(conn: &mut Connection) -> Result<SourceGraph> {
    let version: Option<i64> = conn
        .query_row("SELECT version FROM db_info LIMIT 1", [], |row| row.get(0))
        .optional()?;
    let version = u32::try_from(version.unwrap_or(0))
        .map_err(|_| BiopaxError::Parse("db_info.version out of range".to_string()))?;
    let mut graph = SourceGraph::new(version);

    {
        let mut stmt = conn.prepare("SELECT db_id, display_name FROM species ORDER BY db_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(SourceSpecies {
                db_id: row.get(0)?,
                display_name: row.get(1)?,
            })
        })?;
        for row in rows {
            graph.add_species(row?);
        }
    }

    {
        let mut stmt =
            conn.prepare("SELECT db_id, kind, display_name FROM physical_entities ORDER BY db_id")?;
        let rows = stmt.query_map([], |row| {
            let kind: String = row.get(1)?;
            Ok(SourcePhysicalEntity {
                db_id: row.get(0)?,
                kind: PhysicalEntityKind::parse(&kind),
                display_name: row.get(2)?,
            })
        })?;
        for row in rows {
            graph.add_physical_entity(row?);
        }
    }

    let mut children = grouped(
        conn,
        "SELECT parent_id, child_id FROM event_children ORDER BY parent_id, position",
        |row| Ok((row.get(0)?, row.get::<_, i64>(1)?)),
    )?;
    let mut summations = grouped(
        conn,
        "SELECT event_id, text FROM summations ORDER BY event_id, position",
        |row| Ok((row.get(0)?, Summation { text: row.get(1)? })),
    )?;
    let mut participants = grouped(
        conn,
        "SELECT reaction_id, role, entity_id FROM reaction_participants \
         ORDER BY reaction_id, role, position",
        |row| Ok((row.get(0)?, (row.get::<_, String>(1)?, row.get::<_, i64>(2)?))),
    )?;
    let mut catalysts = grouped(
        conn,
        "SELECT reaction_id, db_id FROM catalyst_activities ORDER BY reaction_id, position",
        |row| {
            Ok((
                row.get(0)?,
                CatalystActivity {
                    db_id: row.get(1)?,
                },
            ))
        },
    )?;

    let mut stmt = conn.prepare(
        "SELECT e.db_id, e.kind, e.display_name, s.display_name \
         FROM events e LEFT JOIN species s ON s.db_id = e.species_id \
         ORDER BY e.db_id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;
    for row in rows {
        let (db_id, kind, display_name, species_name) = row?;
        let summation = summations.remove(&db_id).unwrap_or_default();
        let event = if kind == "pathway" {
            SourceEvent::Pathway(SourcePathway {
                db_id,
                display_name,
                species_name,
                summation,
                has_event: children.remove(&db_id).unwrap_or_default(),
            })
        } else {
            let mut input = Vec::new();
            let mut output = Vec::new();
            for (role, entity) in participants.remove(&db_id).unwrap_or_default() {
                if role == "input" {
                    input.push(entity);
                } else {
                    output.push(entity);
                }
            }
            SourceEvent::Reaction(SourceReaction {
                db_id,
                display_name,
                species_name,
                summation,
                catalyst_activity: catalysts.remove(&db_id).unwrap_or_default(),
                input,
                output,
            })
        };
        graph.add_event(event);
    }

    graph.check_references()?;
    Ok(graph)
}

fn write_graph(conn: &mut Connection, graph: &SourceGraph) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM catalyst_activities; DELETE FROM reaction_participants; \
         DELETE FROM summations; DELETE FROM event_children; DELETE FROM events; \
         DELETE FROM physical_entities; DELETE FROM species; DELETE FROM db_info;",
    )?;
    tx.execute("INSERT INTO db_info (version) VALUES (?1)", params![graph.db_version()])?;

    for s in graph.all_species() {
        tx.execute(
            "INSERT INTO species (db_id, display_name) VALUES (?1, ?2)",
            params![s.db_id, s.display_name],
        )?;
    }
    for pe in graph.physical_entities() {
        tx.execute(
            "INSERT INTO physical_entities (db_id, kind, display_name) VALUES (?1, ?2, ?3)",
            params![pe.db_id, pe.kind.as_str(), pe.display_name],
        )?;
    }

    // Events first so child rows never point at a missing parent.
    for event in graph.events() {
        let kind = match event {
            SourceEvent::Pathway(_) => "pathway",
            SourceEvent::Reaction(_) => "reaction",
        };
        let species_id = event
            .species_name()
            .and_then(|name| graph.species_by_name(name))
            .map(|s| s.db_id);
        tx.execute(
            "INSERT INTO events (db_id, kind, display_name, species_id) VALUES (?1, ?2, ?3, ?4)",
            params![event.db_id(), kind, event.display_name(), species_id],
        )?;
    }

    for event in graph.events() {
        let summation = match event {
            SourceEvent::Pathway(p) => &p.summation,
            SourceEvent::Reaction(r) => &r.summation,
        };
        for (pos, s) in summation.iter().enumerate() {
            tx.execute(
                "INSERT INTO summations (event_id, position, text) VALUES (?1, ?2, ?3)",
                params![event.db_id(), pos as i64, s.text],
            )?;
        }
        match event {
            SourceEvent::Pathway(p) => {
                for (pos, child) in p.has_event.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO event_children (parent_id, position, child_id) VALUES (?1, ?2, ?3)",
                        params![p.db_id, pos as i64, child],
                    )?;
                }
            }
            SourceEvent::Reaction(r) => {
                for (role, ids) in [("input", &r.input), ("output", &r.output)] {
                    for (pos, entity) in ids.iter().enumerate() {
                        tx.execute(
                            "INSERT INTO reaction_participants (reaction_id, role, position, entity_id) \
                             VALUES (?1, ?2, ?3, ?4)",
                            params![r.db_id, role, pos as i64, entity],
                        )?;
                    }
                }
                for (pos, ca) in r.catalyst_activity.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO catalyst_activities (db_id, reaction_id, position) VALUES (?1, ?2, ?3)",
                        params![ca.db_id, r.db_id, pos as i64],
                    )?;
                }
            }
        }
    }

    tx.commit()?;
    log::debug!("Wrote {} events to source store", graph.events().count());
    Ok(())
}
