//! Client for the Firefly III JSON API.
//!
//! Records leave this module with amounts and dates still as strings;
//! shape validation happens here via serde, value validation happens in
//! the aggregator where a bad record becomes a per-record skip.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::date_utils::DateRange;
use crate::error::{ReportError, ReportResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Category roster entry. Categories with no activity in the period still
/// show up in the report as zero rows, so the roster is fetched whole.
#[derive(Debug, Clone)]
pub struct RawCategory {
    pub id: String,
    pub name: String,
}

/// One transaction split as the API reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub amount: String,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub budget_name: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
}

/// Budget with its period spend and resolved limit.
#[derive(Debug, Clone)]
pub struct RawBudget {
    pub name: String,
    pub limit: String,
    pub spent: String,
}

/// Asset or liability account balance snapshot.
#[derive(Debug, Clone)]
pub struct RawAccountBalance {
    pub name: String,
    pub current_balance: Option<String>,
    pub currency_code: Option<String>,
}

/// The standard `{ data: [...], meta: ... }` envelope.
#[derive(Deserialize)]
struct Page<T> {
    data: Vec<Entry<T>>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct Entry<T> {
    id: String,
    attributes: T,
}

#[derive(Deserialize)]
struct Single<T> {
    data: Entry<T>,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct Pagination {
    total_pages: u32,
}

#[derive(Deserialize)]
struct CategoryAttributes {
    name: String,
}

#[derive(Deserialize)]
struct TransactionGroupAttributes {
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Deserialize)]
struct BudgetAttributes {
    name: String,
    #[serde(default)]
    auto_budget_amount: Option<String>,
    #[serde(default)]
    spent: Vec<SpentEntry>,
}

#[derive(Deserialize)]
struct SpentEntry {
    sum: String,
}

#[derive(Deserialize)]
struct LimitAttributes {
    amount: String,
}

#[derive(Deserialize)]
struct AccountAttributes {
    name: String,
    #[serde(default)]
    current_balance: Option<String>,
    #[serde(default)]
    currency_code: Option<String>,
}

pub struct FireflyClient {
    http: Client,
    base_url: String,
    token: String,
}

impl FireflyClient {
    pub fn new(base_url: &str, token: &str) -> ReportResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ReportError::Connection(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fail fast before fetching anything if the instance is unreachable
    /// or the token is bad.
    pub async fn verify_connection(&self) -> ReportResult<()> {
        self.get("/api/v1/about", &[]).await?;
        Ok(())
    }

    pub async fn categories(&self) -> ReportResult<Vec<RawCategory>> {
        info!("Fetching categories");
        let entries = self
            .get_paged::<CategoryAttributes>("/api/v1/categories", &[])
            .await?;
        Ok(entries
            .into_iter()
            .map(|entry| RawCategory {
                id: entry.id,
                name: entry.attributes.name,
            })
            .collect())
    }

    /// All transaction splits in the range, flattened across groups and
    /// pages.
    pub async fn transactions(&self, range: &DateRange) -> ReportResult<Vec<RawTransaction>> {
        info!(start = %range.from_str(), end = %range.to_str(), "Fetching transactions");
        let query = [("start", range.from_str()), ("end", range.to_str())];
        let entries = self
            .get_paged::<TransactionGroupAttributes>("/api/v1/transactions", &query)
            .await?;
        Ok(entries
            .into_iter()
            .flat_map(|entry| entry.attributes.transactions)
            .collect())
    }

    /// Budgets with their spend over the range. The limit comes from the
    /// auto-budget amount when set, otherwise from the first budget limit
    /// in the range, otherwise zero.
    pub async fn budgets(&self, range: &DateRange) -> ReportResult<Vec<RawBudget>> {
        info!("Fetching budgets");
        let roster = self
            .get_paged::<BudgetAttributes>("/api/v1/budgets", &[])
            .await?;
        let query = [("start", range.from_str()), ("end", range.to_str())];

        let mut budgets = Vec::with_capacity(roster.len());
        for entry in roster {
            let path = format!("/api/v1/budgets/{}", entry.id);
            let response = self.get(&path, &query).await?;
            let detail: Single<BudgetAttributes> = Self::parse_json(&path, response).await?;
            let attributes = detail.data.attributes;

            let spent = attributes
                .spent
                .first()
                .map(|entry| entry.sum.clone())
                .unwrap_or_else(|| "0".to_string());
            let limit = match attributes.auto_budget_amount {
                Some(amount) => amount,
                None => self.budget_limit(&entry.id, range).await?,
            };

            budgets.push(RawBudget {
                name: attributes.name,
                limit,
                spent,
            });
        }
        Ok(budgets)
    }

    async fn budget_limit(&self, id: &str, range: &DateRange) -> ReportResult<String> {
        let path = format!("/api/v1/budgets/{id}/limits");
        let query = [("start", range.from_str()), ("end", range.to_str())];
        let response = self.get(&path, &query).await?;
        let parsed: Page<LimitAttributes> = Self::parse_json(&path, response).await?;
        Ok(parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.attributes.amount)
            .unwrap_or_else(|| "0".to_string()))
    }

    /// Current balances across all asset and liability accounts.
    pub async fn account_balances(&self) -> ReportResult<Vec<RawAccountBalance>> {
        info!("Fetching account balances");
        let mut accounts = Vec::new();
        for account_type in ["asset", "liability"] {
            let query = [("type", account_type.to_string())];
            let entries = self
                .get_paged::<AccountAttributes>("/api/v1/accounts", &query)
                .await?;
            accounts.extend(entries.into_iter().map(|entry| RawAccountBalance {
                name: entry.attributes.name,
                current_balance: entry.attributes.current_balance,
                currency_code: entry.attributes.currency_code,
            }));
        }
        Ok(accounts)
    }

    /// GET a collection endpoint, following pagination until exhausted.
    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ReportResult<Vec<Entry<T>>> {
        let mut entries = Vec::new();
        let mut page = 1u32;
        loop {
            let mut paged_query: Vec<(&str, String)> = query.to_vec();
            paged_query.push(("page", page.to_string()));
            let response = self.get(path, &paged_query).await?;
            let parsed: Page<T> = Self::parse_json(path, response).await?;

            entries.extend(parsed.data);
            let total_pages = parsed
                .meta
                .and_then(|meta| meta.pagination)
                .map(|pagination| pagination.total_pages)
                .unwrap_or(1);
            if page >= total_pages {
                break;
            }
            page += 1;
        }
        Ok(entries)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ReportResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ReportError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ReportError::Auth(format!("{path} returned {status}")))
        } else {
            let detail = Self::error_detail(response).await;
            Err(ReportError::Api(format!(
                "{path} returned {status}: {detail}"
            )))
        }
    }

    async fn parse_json<T: DeserializeOwned>(path: &str, response: Response) -> ReportResult<T> {
        response
            .json()
            .await
            .map_err(|e| ReportError::Api(format!("failed to parse {path} response: {e}")))
    }

    /// Pull the `message` field out of the API's JSON error body, falling
    /// back to the raw body.
    async fn error_detail(response: Response) -> String {
        #[derive(Deserialize)]
        struct ApiErrorBody {
            message: String,
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) => body.chars().take(200).collect(),
        }
    }
}
