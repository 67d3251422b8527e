use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{output_item, output_items, output_success};
use crate::cli::{with_entity, EntityKind, OutputFormat};
use crate::config::CONFIG;
use crate::error::StoreError;
use crate::filter::{Filter, FilterOrder, Where};
use crate::models::Entity;
use crate::store::{FileStorage, Store, StoreOptions};

#[derive(Subcommand)]
pub enum StoreCommands {
    #[command(about = "List stored entities")]
    List {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(long, help = "Only entities that are not soft-deleted")]
        active: bool,
    },

    #[command(about = "Show one entity by id")]
    Get {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(help = "Entity ID")]
        id: String,
    },

    #[command(about = "Query entities with a JSON where clause")]
    Find {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(long = "where", help = "JSON where clause, e.g. '{\"status\": {\"$eq\": \"Paid\"}}'")]
        where_clause: Option<String>,
        #[arg(long, help = "Sort order, e.g. 'created_at desc, title asc'")]
        order: Option<String>,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
        #[arg(long, help = "1-based page (requires --limit)")]
        page: Option<usize>,
    },

    #[command(about = "Case-insensitive text search")]
    Search {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(help = "Search text")]
        query: String,
        #[arg(long = "field", help = "Restrict search to a field (repeatable)")]
        fields: Vec<String>,
    },

    #[command(about = "Remove one entity by id")]
    Remove {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
        #[arg(help = "Entity ID")]
        id: String,
    },

    #[command(about = "Delete the persisted store")]
    Clear {
        #[arg(value_enum, help = "Entity kind")]
        kind: EntityKind,
    },
}

pub async fn handle(cmd: StoreCommands, storage: &FileStorage, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        StoreCommands::List { kind, active } => {
            with_entity!(kind, E => handle_list::<E>(storage, active, &output_format).await)
        }
        StoreCommands::Get { kind, id } => {
            with_entity!(kind, E => handle_get::<E>(storage, &id, &output_format).await)
        }
        StoreCommands::Find { kind, where_clause, order, limit, page } => {
            let query = FindQuery { where_clause, order, limit, page };
            with_entity!(kind, E => handle_find::<E>(storage, &query, &output_format).await)
        }
        StoreCommands::Search { kind, query, fields } => {
            with_entity!(kind, E => handle_search::<E>(storage, &query, &fields, &output_format).await)
        }
        StoreCommands::Remove { kind, id } => {
            with_entity!(kind, E => handle_remove::<E>(storage, &id, &output_format).await)
        }
        StoreCommands::Clear { kind } => {
            with_entity!(kind, E => handle_clear::<E>(storage, &output_format).await)
        }
    }
}

pub struct FindQuery {
    pub where_clause: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub page: Option<usize>,
}

impl FindQuery {
    /// Parse the raw CLI arguments into a filter
    pub fn to_filter(&self) -> Result<Filter, StoreError> {
        let mut filter = Filter::with_max_limit(CONFIG.filter.max_limit);

        if let Some(raw) = &self.where_clause {
            let where_data: Value = serde_json::from_str(raw)?;
            filter.where_clause(Where::from_json(&where_data, CONFIG.filter.max_nested_depth)?);
        }
        if let Some(order) = &self.order {
            filter.order(FilterOrder::validate_and_parse(&Value::String(order.clone()))?);
        }
        if let Some(limit) = self.limit {
            filter.limit(limit, self.page)?;
        }
        Ok(filter)
    }
}

/// Open the persisted store for `T`, empty when nothing has been saved yet
pub async fn open_store<T: Entity>(storage: &FileStorage) -> anyhow::Result<Store<T>> {
    let mut store = Store::new(StoreOptions::for_entity().persist(true));
    store.load(storage).await?;
    Ok(store)
}

async fn handle_list<T: Entity>(storage: &FileStorage, active: bool, output_format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store::<T>(storage).await?;
    let items: Vec<&T> = if active {
        store.active_items()
    } else {
        store.items().iter().collect()
    };
    output_items(output_format, store.name(), &items)
}

async fn handle_get<T: Entity>(storage: &FileStorage, id: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store::<T>(storage).await?;
    let item = store.get_by_id(id).ok_or_else(|| StoreError::not_found(id))?;
    output_item(output_format, item)
}

async fn handle_find<T: Entity>(storage: &FileStorage, query: &FindQuery, output_format: &OutputFormat) -> anyhow::Result<()> {
    let filter = query.to_filter()?;
    let store = open_store::<T>(storage).await?;
    let items = filter.apply(store.items());
    tracing::debug!(store = store.name(), matched = items.len(), total = filter.count(store.items()), "Find");
    output_items(output_format, store.name(), &items)
}

async fn handle_search<T: Entity>(
    storage: &FileStorage,
    query: &str,
    fields: &[String],
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let store = open_store::<T>(storage).await?;
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
    let items = store.search(query, (!fields.is_empty()).then_some(fields.as_slice()));
    output_items(output_format, store.name(), &items)
}

async fn handle_remove<T: Entity>(storage: &FileStorage, id: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut store = open_store::<T>(storage).await?;
    if store.get_by_id(id).is_none() {
        return Err(StoreError::not_found(id).into());
    }

    store.remove_item(id);
    store.save(storage).await?;

    output_success(
        output_format,
        &format!("Removed '{}' from {}", id, store.name()),
        Some(json!({ "id": id, "remaining": store.len() })),
    )
}

async fn handle_clear<T: Entity>(storage: &FileStorage, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut store = open_store::<T>(storage).await?;
    let removed = store.len();
    store.purge(storage).await?;

    output_success(
        output_format,
        &format!("Cleared {} ({} items)", store.name(), removed),
        Some(json!({ "store": store.name(), "removed": removed })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(where_clause: Option<&str>, order: Option<&str>, limit: Option<usize>) -> FindQuery {
        FindQuery {
            where_clause: where_clause.map(str::to_string),
            order: order.map(str::to_string),
            limit,
            page: None,
        }
    }

    #[test]
    fn find_query_builds_a_filter() {
        let filter = query(Some(r#"{"status": "Paid"}"#), Some("amount desc"), Some(2))
            .to_filter()
            .unwrap();
        let rows = vec![
            json!({"status": "Paid", "amount": 10}),
            json!({"status": "Paid", "amount": 30}),
            json!({"status": "Pending", "amount": 50}),
            json!({"status": "Paid", "amount": 20}),
        ];
        let amounts: Vec<_> = filter.apply(&rows).iter().map(|r| r["amount"].clone()).collect();
        assert_eq!(amounts, vec![json!(30), json!(20)]);
    }

    #[test]
    fn find_query_rejects_bad_input() {
        assert!(query(Some("{not json"), None, None).to_filter().is_err());
        assert!(query(None, Some("amount sideways"), None).to_filter().is_err());
        assert!(query(None, None, Some(0)).to_filter().is_err());
    }
}
