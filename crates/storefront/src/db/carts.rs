//! `PostgreSQL` cart store.
//!
//! Carts are rows of `commerce_order`; the store only touches the columns the
//! cart rules read and the flags the storefront may change.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use advanced_cart_core::provider::{CartQuery, CartStore, SortOrder};
use advanced_cart_core::{Cart, CartId, CustomerId, NewCart, OrderState, OrderType, StoreId};

use super::RepositoryError;

const CART_COLUMNS: &str = "order_id, type AS order_type, store_id, uid, state, cart, locked, \
                            non_current_cart, item_count, created_at, changed_at";

/// Row type for `commerce_order`.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    order_id: i32,
    order_type: String,
    store_id: i32,
    uid: i32,
    state: String,
    cart: bool,
    locked: bool,
    non_current_cart: bool,
    item_count: i32,
    created_at: DateTime<Utc>,
    changed_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for Cart {
    type Error = RepositoryError;

    fn try_from(row: CartRow) -> Result<Self, Self::Error> {
        let state = row.state.parse::<OrderState>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.order_id))
        })?;
        let item_count = u32::try_from(row.item_count).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order {}: negative item count {}",
                row.order_id, row.item_count
            ))
        })?;

        Ok(Self {
            id: CartId::new(row.order_id),
            customer_id: CustomerId::new(row.uid),
            store_id: StoreId::new(row.store_id),
            order_type: OrderType::new(row.order_type),
            state,
            is_cart: row.cart,
            locked: row.locked,
            non_current: row.non_current_cart,
            item_count,
            created_at: row.created_at,
            changed_at: row.changed_at,
        })
    }
}

/// The `item_count` column value of a cart, refusing counts the column cannot hold.
fn item_count_column(cart: &Cart) -> Result<i32, RepositoryError> {
    i32::try_from(cart.item_count).map_err(|_| {
        RepositoryError::DataCorruption(format!(
            "order {}: item count {} out of range",
            cart.id, cart.item_count
        ))
    })
}

fn into_carts(rows: Vec<CartRow>) -> Result<Vec<Cart>, RepositoryError> {
    rows.into_iter().map(Cart::try_from).collect()
}

/// Cart store over the `commerce_order` table.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a new cart store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the `WHERE` and `ORDER BY` clauses of a cart query.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CartQuery) {
    builder.push(" WHERE TRUE");
    if let Some(state) = query.state {
        builder.push(" AND state = ").push_bind(state.as_str());
    }
    if let Some(is_cart) = query.is_cart {
        builder.push(" AND cart = ").push_bind(is_cart);
    }
    if let Some(locked) = query.locked {
        builder.push(" AND locked = ").push_bind(locked);
    }
    if let Some(customer_id) = query.customer_id {
        builder.push(" AND uid = ").push_bind(customer_id.as_i32());
    }
    if let Some(non_current) = query.non_current {
        builder
            .push(" AND non_current_cart = ")
            .push_bind(non_current);
    }
    builder.push(match query.order {
        SortOrder::Ascending => " ORDER BY order_id ASC",
        SortOrder::Descending => " ORDER BY order_id DESC",
    });
}

impl CartStore for PgCartStore {
    type Error = RepositoryError;

    #[instrument(skip(self))]
    async fn create(&self, cart: NewCart) -> Result<Cart, Self::Error> {
        let sql = format!(
            r"
            INSERT INTO commerce_order (type, store_id, uid, state, cart)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {CART_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(cart.order_type.as_str())
            .bind(cart.store_id.as_i32())
            .bind(cart.customer_id.as_i32())
            .bind(OrderState::Draft.as_str())
            .fetch_one(&self.pool)
            .await?;

        Cart::try_from(row)
    }

    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        let item_count = item_count_column(cart)?;
        let result = sqlx::query(
            r"
            UPDATE commerce_order
            SET state = $2, cart = $3, locked = $4, non_current_cart = $5, item_count = $6,
                changed_at = NOW()
            WHERE order_id = $1
            ",
        )
        .bind(cart.id.as_i32())
        .bind(cart.state.as_str())
        .bind(cart.is_cart)
        .bind(cart.locked)
        .bind(cart.non_current)
        .bind(item_count)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn load(&self, id: CartId) -> Result<Option<Cart>, Self::Error> {
        let sql = format!("SELECT {CART_COLUMNS} FROM commerce_order WHERE order_id = $1");
        let row = sqlx::query_as::<_, CartRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Cart::try_from).transpose()
    }

    async fn load_multiple(&self, ids: &[CartId]) -> Result<Vec<Cart>, Self::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(CartId::as_i32).collect();
        let sql = format!("SELECT {CART_COLUMNS} FROM commerce_order WHERE order_id = ANY($1)");
        let rows = sqlx::query_as::<_, CartRow>(&sql)
            .bind(raw_ids)
            .fetch_all(&self.pool)
            .await?;
        let mut carts = into_carts(rows)?;

        // Follow the order the ids were asked in.
        carts.sort_by_key(|cart| ids.iter().position(|id| *id == cart.id));
        Ok(carts)
    }

    #[instrument(skip(self))]
    async fn query(&self, query: &CartQuery) -> Result<Vec<Cart>, Self::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CART_COLUMNS} FROM commerce_order"
        ));
        push_filters(&mut builder, query);

        let rows = builder
            .build_query_as::<CartRow>()
            .fetch_all(&self.pool)
            .await?;

        into_carts(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> CartRow {
        let now = Utc::now();
        CartRow {
            order_id: 101,
            order_type: "default".to_string(),
            store_id: 1,
            uid: 42,
            state: "draft".to_string(),
            cart: true,
            locked: false,
            non_current_cart: true,
            item_count: 3,
            created_at: now,
            changed_at: now,
        }
    }

    #[test]
    fn test_row_to_cart() {
        let cart = Cart::try_from(row()).unwrap();
        assert_eq!(cart.id, CartId::new(101));
        assert_eq!(cart.customer_id, CustomerId::new(42));
        assert_eq!(cart.order_type.as_str(), "default");
        assert_eq!(cart.state, OrderState::Draft);
        assert!(cart.non_current);
        assert_eq!(cart.item_count, 3);
    }

    #[test]
    fn test_row_with_unknown_state_is_corrupt() {
        let row = CartRow {
            state: "shipped".to_string(),
            ..row()
        };
        assert!(matches!(
            Cart::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_with_negative_item_count_is_corrupt() {
        let row = CartRow {
            item_count: -1,
            ..row()
        };
        assert!(matches!(
            Cart::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_item_count_out_of_column_range_is_refused() {
        let mut cart = Cart::try_from(row()).unwrap();
        assert_eq!(item_count_column(&cart).unwrap(), 3);

        cart.item_count = u32::MAX;
        assert!(matches!(
            item_count_column(&cart),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_current_carts_query_sql() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT order_id FROM commerce_order");
        push_filters(&mut builder, &CartQuery::current_carts(CustomerId::new(42)));

        assert_eq!(
            builder.sql(),
            "SELECT order_id FROM commerce_order WHERE TRUE AND state = $1 AND cart = $2 \
             AND locked = $3 AND uid = $4 AND non_current_cart = $5 ORDER BY order_id DESC"
        );
    }

    #[test]
    fn test_unfiltered_query_sql() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT order_id FROM commerce_order");
        let query = CartQuery {
            order: SortOrder::Ascending,
            ..CartQuery::default()
        };
        push_filters(&mut builder, &query);

        assert_eq!(
            builder.sql(),
            "SELECT order_id FROM commerce_order WHERE TRUE ORDER BY order_id ASC"
        );
    }
}
