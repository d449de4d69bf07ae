use std::path::Path;

use rusqlite::{params, types::ToSql, Connection, OptionalExtension, Result, Row};

use crate::cards::collection_card::{CollectionCard, NewCard};

/// Storage for collection cards. Ids are assigned by the repository.
pub trait CardRepository {
    fn create(&self, card: &NewCard) -> Result<i64>;
    fn update(&self, id: i64, card: &NewCard) -> Result<bool>;
    fn update_price(&self, id: i64, price: f64) -> Result<bool>;
    fn delete(&self, id: i64) -> Result<bool>;
    fn get_by_id(&self, id: i64) -> Result<Option<CollectionCard>>;
    /// Looks a serial number up for one user, or across all users when `user_id` is `None`.
    fn get_by_serial(&self, serial: &str, user_id: Option<i64>) -> Result<Option<CollectionCard>>;
    fn get_all_by_user(&self, user_id: i64) -> Result<Vec<CollectionCard>>;
    /// Cards whose name, serial number or set contains `term`.
    fn search(&self, term: &str) -> Result<Vec<CollectionCard>>;
}

pub struct SqliteCardRepository {
    conn: Connection,
}

impl SqliteCardRepository {
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let repository = SqliteCardRepository { conn };
        repository.create_tables()?;
        Ok(repository)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS cards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                serial_number TEXT NOT NULL,
                card_name TEXT NOT NULL,
                set_name TEXT NOT NULL DEFAULT '',
                card_number TEXT NOT NULL DEFAULT '',
                rarity TEXT NOT NULL DEFAULT '',
                condition_card TEXT NOT NULL DEFAULT 'Near Mint',
                quantity INTEGER NOT NULL DEFAULT 1,
                purchase_price REAL,
                current_price REAL,
                cardmarket_url TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                last_price_update TEXT
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cards_user_serial ON cards (user_id, serial_number)",
            [],
        )?;
        Ok(())
    }

    fn row_to_card(row: &Row) -> Result<CollectionCard> {
        Ok(CollectionCard {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            serial_number: row.get("serial_number")?,
            card_name: row.get("card_name")?,
            set_name: row.get("set_name")?,
            card_number: row.get("card_number")?,
            rarity: row.get("rarity")?,
            condition_card: row.get("condition_card")?,
            quantity: row.get("quantity")?,
            purchase_price: row.get("purchase_price")?,
            current_price: row.get("current_price")?,
            cardmarket_url: row.get("cardmarket_url")?,
            image_url: row.get("image_url")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            last_price_update: row.get("last_price_update")?,
        })
    }

    fn query_cards(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<CollectionCard>> {
        let mut stmt = self.conn.prepare(sql)?;
        let cards = stmt
            .query_map(params, Self::row_to_card)?
            .collect::<Result<Vec<CollectionCard>>>()?;
        Ok(cards)
    }
}

impl CardRepository for SqliteCardRepository {
    fn create(&self, card: &NewCard) -> Result<i64> {
        let sql = "INSERT INTO cards (
            user_id, serial_number, card_name, set_name, card_number, rarity, condition_card,
            quantity, purchase_price, current_price, cardmarket_url, image_url, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

        let params: &[&dyn ToSql] = &[
            &card.user_id,
            &card.serial_number,
            &card.card_name,
            &card.set_name,
            &card.card_number,
            &card.rarity,
            &card.condition_card,
            &card.quantity,
            &card.purchase_price,
            &card.current_price,
            &card.cardmarket_url,
            &card.image_url,
            &card.notes,
        ];

        self.conn.execute(sql, params)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: i64, card: &NewCard) -> Result<bool> {
        let sql = "UPDATE cards SET
            serial_number = ?2, card_name = ?3, set_name = ?4, card_number = ?5, rarity = ?6,
            condition_card = ?7, quantity = ?8, purchase_price = ?9, current_price = ?10,
            cardmarket_url = ?11, image_url = ?12, notes = ?13
        WHERE id = ?1";

        let params: &[&dyn ToSql] = &[
            &id,
            &card.serial_number,
            &card.card_name,
            &card.set_name,
            &card.card_number,
            &card.rarity,
            &card.condition_card,
            &card.quantity,
            &card.purchase_price,
            &card.current_price,
            &card.cardmarket_url,
            &card.image_url,
            &card.notes,
        ];

        Ok(self.conn.execute(sql, params)? > 0)
    }

    fn update_price(&self, id: i64, price: f64) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE cards SET current_price = ?2, last_price_update = CURRENT_TIMESTAMP WHERE id = ?1",
            params![id, price],
        )?;
        Ok(updated > 0)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute("DELETE FROM cards WHERE id = ?1", params![id])? > 0)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<CollectionCard>> {
        self.conn
            .query_row(
                "SELECT * FROM cards WHERE id = ?1 LIMIT 1",
                params![id],
                Self::row_to_card,
            )
            .optional()
    }

    fn get_by_serial(&self, serial: &str, user_id: Option<i64>) -> Result<Option<CollectionCard>> {
        let card = match user_id {
            Some(user_id) => self.conn.query_row(
                "SELECT * FROM cards WHERE serial_number = ?1 AND user_id = ?2 LIMIT 1",
                params![serial, user_id],
                Self::row_to_card,
            ),
            None => self.conn.query_row(
                "SELECT * FROM cards WHERE serial_number = ?1 LIMIT 1",
                params![serial],
                Self::row_to_card,
            ),
        };
        card.optional()
    }

    fn get_all_by_user(&self, user_id: i64) -> Result<Vec<CollectionCard>> {
        self.query_cards(
            "SELECT * FROM cards WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            &[&user_id],
        )
    }

    fn search(&self, term: &str) -> Result<Vec<CollectionCard>> {
        let pattern = format!("%{}%", term);
        self.query_cards(
            "SELECT * FROM cards
             WHERE card_name LIKE ?1 OR serial_number LIKE ?1 OR set_name LIKE ?1
             ORDER BY created_at DESC, id DESC",
            &[&pattern],
        )
    }
}
