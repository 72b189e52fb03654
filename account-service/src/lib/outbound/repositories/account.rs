use async_trait::async_trait;
use auth::CredentialStore;
use auth::CredentialStoreError;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

const USERNAME_CONSTRAINT: &str = "accounts_username_key";
const EMAIL_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

fn violated_constraint(error: &sqlx::Error) -> Option<String> {
    error
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint().map(str::to_string))
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, first_name, last_name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some(USERNAME_CONSTRAINT) => {
                AccountError::UsernameAlreadyExists(account.username.as_str().to_string())
            }
            Some(EMAIL_CONSTRAINT) => {
                AccountError::EmailAlreadyExists(account.email.as_str().to_string())
            }
            _ => AccountError::DatabaseError(e.to_string()),
        })?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, first_name, last_name, email, password_hash, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl CredentialStore for PostgresAccountRepository {
    async fn lookup_credential(
        &self,
        username: &str,
    ) -> Result<Option<String>, CredentialStoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT password_hash
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))
    }

    async fn persist_username_change(
        &self,
        old: &str,
        new: &str,
    ) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2
            WHERE username = $1
            "#,
        )
        .bind(old)
        .bind(new)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some(USERNAME_CONSTRAINT) => CredentialStoreError::AlreadyExists,
            _ => CredentialStoreError::Unavailable(e.to_string()),
        })?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::NotFound);
        }

        Ok(())
    }

    async fn delete_credential(&self, username: &str) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::NotFound);
        }

        Ok(())
    }
}
