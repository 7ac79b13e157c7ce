use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, CancellationReason, KeySchemaElement, KeyType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use serde_json::Value;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::utils::date::DATE_FMT;

pub(crate) async fn create_table(client: &Client, table_name: &str, pk: &str) -> LibraryResult<()> {
    match client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(pk)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        )
        .send()
        .await
    {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to create {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

#[cfg(test)]
pub(crate) async fn delete_table(client: &Client, table_name: &str) -> LibraryResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to delete {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _i in 0..30 {
        if let Ok(status) = describe_table(client, table_name).await {
            if status != other_status {
                return;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn describe_table(client: &Client, table_name: &str) -> LibraryResult<TableStatus> {
    match client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
    {
        Ok(out) => {
            if let Some(table) = out.table() {
                if let Some(status) = table.table_status() {
                    return Ok(status.clone());
                }
            }
            Err(LibraryError::runtime(format!("failed to describe {} table",
                                              table_name).as_str(), None))
        }
        Err(err) => {
            Err(LibraryError::database_or_unavailable(format!("failed to describe {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("failed to parse{:?}", other)),
    }
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        return Some(str.clone());
    }
    None
}

pub(crate) fn parse_date_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<NaiveDateTime> {
    if let Some(AttributeValue::S(str)) = map.get(name) {
        // e.g. 2022-09-24T04:40:35.726029
        if let Ok(date) = NaiveDateTime::parse_from_str(str, DATE_FMT) {
            return Some(date);
        }
    }
    None
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => {
            AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect())
        }
    }
}

// helper method to build db-client for the configured store
pub(crate) async fn build_db_client(config: &Configuration) -> Client {
    match config.store {
        RepositoryStore::LocalDynamoDB => {
            // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
            let dynamodb_local_config = aws_sdk_dynamodb::Config::builder()
                .region(Region::new("local"))
                .credentials_provider(
                    Credentials::new("AKIDLOCALSTACK", "localstacksecret", None, None, "faked"))
                .endpoint_url(config.ddb_endpoint.as_str())
                .build();
            Client::from_conf(dynamodb_local_config)
        }
        _ => {
            //Get config from environment.
            let sdk_config = aws_config::load_from_env().await;
            Client::new(&sdk_config)
        }
    }
}

impl From<SdkError<GetItemError>> for LibraryError {
    fn from(err: SdkError<GetItemError>) -> Self {
        let classified = match as_service_error(&err) {
            Some(GetItemError::ProvisionedThroughputExceededException(_)) => Some((true, "ProvisionedThroughputExceeded")),
            Some(GetItemError::RequestLimitExceeded(_)) => Some((true, "RequestLimitExceeded")),
            Some(GetItemError::InternalServerError(_)) => Some((true, "InternalServerError")),
            Some(GetItemError::ResourceNotFoundException(_)) => Some((false, "ResourceNotFound")),
            _ => None,
        };
        sdk_failure(&err, classified)
    }
}

impl From<SdkError<DeleteItemError>> for LibraryError {
    fn from(err: SdkError<DeleteItemError>) -> Self {
        let classified = match as_service_error(&err) {
            Some(DeleteItemError::ProvisionedThroughputExceededException(_)) => Some((true, "ProvisionedThroughputExceeded")),
            Some(DeleteItemError::RequestLimitExceeded(_)) => Some((true, "RequestLimitExceeded")),
            Some(DeleteItemError::InternalServerError(_)) => Some((true, "InternalServerError")),
            Some(DeleteItemError::TransactionConflictException(_)) => Some((true, "TransactionConflict")),
            Some(DeleteItemError::ResourceNotFoundException(_)) => Some((false, "ResourceNotFound")),
            Some(DeleteItemError::ConditionalCheckFailedException(_)) => Some((false, "ConditionalCheckFailed")),
            _ => None,
        };
        sdk_failure(&err, classified)
    }
}

impl From<SdkError<TransactWriteItemsError>> for LibraryError {
    fn from(err: SdkError<TransactWriteItemsError>) -> Self {
        let classified = match as_service_error(&err) {
            Some(TransactWriteItemsError::TransactionCanceledException(cancelled)) => {
                return transaction_cancelled(cancelled.cancellation_reasons());
            }
            Some(TransactWriteItemsError::ProvisionedThroughputExceededException(_)) => Some((true, "ProvisionedThroughputExceeded")),
            Some(TransactWriteItemsError::RequestLimitExceeded(_)) => Some((true, "RequestLimitExceeded")),
            Some(TransactWriteItemsError::InternalServerError(_)) => Some((true, "InternalServerError")),
            Some(TransactWriteItemsError::TransactionInProgressException(_)) => Some((true, "TransactionInProgress")),
            Some(TransactWriteItemsError::ResourceNotFoundException(_)) => Some((false, "ResourceNotFound")),
            _ => None,
        };
        sdk_failure(&err, classified)
    }
}

// Only a failed attribute_not_exists condition means the isbn guard item is taken; a
// cancellation due to a conflicting concurrent write can be retried.
fn transaction_cancelled(reasons: Option<&[CancellationReason]>) -> LibraryError {
    let codes: Vec<&str> = reasons.unwrap_or_default().iter().filter_map(|r| r.code()).collect();
    if codes.contains(&"ConditionalCheckFailed") {
        LibraryError::duplicate_key(format!("transaction cancelled {:?}", codes).as_str())
    } else {
        LibraryError::unavailable(format!("transaction cancelled {:?}", codes).as_str(),
                                  Some("TransactionCanceled".to_string()), true)
    }
}

fn sdk_failure<T>(err: &SdkError<T>, classified: Option<(bool, &str)>) -> LibraryError
    where SdkError<T>: std::fmt::Debug {
    let (retryable, reason) = match classified {
        Some((retryable, code)) => (retryable, Some(code.to_string())),
        None => retryable_sdk_error(err),
    };
    LibraryError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
}

// errors the operation model does not name, e.g. ThrottlingException or ValidationException
fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => { (false, Some("ConstructionFailure".to_string())) }
        SdkError::TimeoutError(_) => { (true, Some("TimeoutError".to_string())) }
        SdkError::DispatchFailure(_) => { (true, Some("DispatchFailure".to_string())) }
        SdkError::ResponseError { .. } => { (true, Some("ResponseError".to_string())) }
        SdkError::ServiceError(ctx) => {
            let http = ctx.raw().http();
            (http.status().is_server_error() || is_throttled(http.body().bytes()), Some("ServiceError".to_string()))
        }
        _ => { (true, Some("Unknown".to_string())) }
    }
}

// throttling errors read "...ThroughputExceeded...", "...LimitExceeded..." or "ThrottlingException"
fn is_throttled(opts: Option<&[u8]>) -> bool {
    if let Some(b) = opts {
        return b.windows(6).any(|w| w == b"ceeded") || b.windows(10).any(|w| w == b"Throttling");
    }
    false
}


// equivalent of SdkError::as_service_error, which the pinned aws-smithy-http 0.55 lacks
fn as_service_error<E, R>(err: &SdkError<E, R>) -> Option<&E> {
    match err {
        SdkError::ServiceError(ctx) => Some(ctx.err()),
        _ => None,
    }
}
