use std::sync::Arc;

use crate::{
    api::{self, JsonClient},
    client::RequestExecutor,
    types::{
        AddTagsToStreamInput, CreateStreamInput, DeleteStreamInput, DescribeStreamInput,
        DescribeStreamOutput, GetRecordsInput, GetRecordsOutput, GetShardIteratorInput,
        GetShardIteratorOutput, KinesisConfig, KinesisError, ListStreamsInput, ListStreamsOutput,
        ListTagsForStreamInput, ListTagsForStreamOutput, MergeShardsInput, PutRecordInput,
        PutRecordOutput, PutRecordsInput, PutRecordsOutput, RemoveTagsFromStreamInput,
        SplitShardInput,
    },
};

#[derive(Debug, Clone)]
/// Client for Amazon Kinesis Data Streams.
///
/// Each operation performs exactly one signed request. Nothing is retried and
/// paginated listings return a single page. Clones share the connection pool.
pub struct Kinesis {
    client: JsonClient,
}

impl Kinesis {
    /// Create a new [`Kinesis`] that sends requests over the default HTTPS
    /// connection pool.
    pub fn new(config: KinesisConfig) -> Result<Self, KinesisError> {
        Ok(Self {
            client: JsonClient::init(&config)?,
        })
    }

    /// Create a new [`Kinesis`] that sends requests with `executor`.
    pub fn with_executor(
        config: KinesisConfig,
        executor: impl RequestExecutor,
    ) -> Result<Self, KinesisError> {
        Ok(Self {
            client: JsonClient::init_with_executor(&config, Arc::new(executor))?,
        })
    }

    /// Add or overwrite tags on a stream.
    pub async fn add_tags_to_stream(
        &self,
        input: AddTagsToStreamInput,
    ) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::AddTagsToStream>(&input).await?)
    }

    /// Create a stream.
    ///
    /// The stream starts in [`StreamStatus::Creating`](crate::types::StreamStatus::Creating)
    /// and becomes usable once it is `ACTIVE`.
    pub async fn create_stream(&self, input: CreateStreamInput) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::CreateStream>(&input).await?)
    }

    /// Delete a stream and all its shards and data.
    pub async fn delete_stream(&self, input: DeleteStreamInput) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::DeleteStream>(&input).await?)
    }

    /// Describe a stream, including a page of its shards.
    pub async fn describe_stream(
        &self,
        input: DescribeStreamInput,
    ) -> Result<DescribeStreamOutput, KinesisError> {
        Ok(self.client.invoke::<api::DescribeStream>(&input).await?)
    }

    /// Read records from a shard iterator.
    pub async fn get_records(
        &self,
        input: GetRecordsInput,
    ) -> Result<GetRecordsOutput, KinesisError> {
        Ok(self.client.invoke::<api::GetRecords>(&input).await?)
    }

    /// Get an iterator for reading a shard.
    pub async fn get_shard_iterator(
        &self,
        input: GetShardIteratorInput,
    ) -> Result<GetShardIteratorOutput, KinesisError> {
        Ok(self.client.invoke::<api::GetShardIterator>(&input).await?)
    }

    /// List a page of stream names.
    pub async fn list_streams(
        &self,
        input: ListStreamsInput,
    ) -> Result<ListStreamsOutput, KinesisError> {
        Ok(self.client.invoke::<api::ListStreams>(&input).await?)
    }

    /// List a page of a stream's tags.
    pub async fn list_tags_for_stream(
        &self,
        input: ListTagsForStreamInput,
    ) -> Result<ListTagsForStreamOutput, KinesisError> {
        Ok(self.client.invoke::<api::ListTagsForStream>(&input).await?)
    }

    /// Merge two adjacent shards.
    pub async fn merge_shards(&self, input: MergeShardsInput) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::MergeShards>(&input).await?)
    }

    /// Write a single record.
    pub async fn put_record(&self, input: PutRecordInput) -> Result<PutRecordOutput, KinesisError> {
        Ok(self.client.invoke::<api::PutRecord>(&input).await?)
    }

    /// Write a batch of records.
    ///
    /// Individual records can fail while the call succeeds; see
    /// [`PutRecordsOutput::failed_records`].
    pub async fn put_records(
        &self,
        input: PutRecordsInput,
    ) -> Result<PutRecordsOutput, KinesisError> {
        Ok(self.client.invoke::<api::PutRecords>(&input).await?)
    }

    /// Remove tags from a stream.
    pub async fn remove_tags_from_stream(
        &self,
        input: RemoveTagsFromStreamInput,
    ) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::RemoveTagsFromStream>(&input).await?)
    }

    /// Split a shard in two at a hash key.
    pub async fn split_shard(&self, input: SplitShardInput) -> Result<(), KinesisError> {
        Ok(self.client.invoke::<api::SplitShard>(&input).await?)
    }
}
