//! Blob encoding for stored documents, result chunks, and location rows.
//!
//! Every blob is a MessagePack encoding of its value compressed with zstd. Decoding is
//! all-or-nothing: a document either decodes completely or fails.

use crate::error::CodecError;
use crate::storage::records::{DocumentRecord, LocationRecord, ResultChunkRecord};
use codenav_api::{
    DiagnosticData, DocumentData, DocumentIdRangeId, Id, LocationData, MonikerData, MonikerKey,
    PackageInformationData, RangeData, ResultChunkData, ResultKind, UploadId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const ZSTD_LEVEL: i32 = 0;

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let bytes = rmp_serde::to_vec(value)?;
    Ok(zstd::encode_all(&bytes[..], ZSTD_LEVEL)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let decompressed = zstd::decode_all(bytes)?;
    Ok(rmp_serde::from_slice(&decompressed)?)
}

fn decode_column<T: DeserializeOwned + Default>(column: Option<&[u8]>) -> Result<T, CodecError> {
    match column {
        Some(bytes) => decode(bytes),
        None => Ok(T::default()),
    }
}

/// An opaque SCIP document. Decoding SCIP is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScipDocument {
    pub bytes: Vec<u8>,
}

/// The shape a stored document decodes into.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPayload {
    Lsif(DocumentData),
    Scip(ScipDocument),
}

pub fn encode_document(
    upload_id: UploadId,
    path: &str,
    document: &DocumentData,
) -> Result<DocumentRecord, CodecError> {
    Ok(DocumentRecord {
        upload_id,
        path: path.to_string(),
        ranges: Some(encode(&document.ranges)?),
        hovers: Some(encode(&document.hover_results)?),
        monikers: Some(encode(&document.monikers)?),
        packages: Some(encode(&document.package_information)?),
        diagnostics: Some(encode(&document.diagnostics)?),
        scip_document: None,
    })
}

pub fn decode_document(record: &DocumentRecord) -> Result<DocumentPayload, CodecError> {
    if let Some(bytes) = &record.scip_document {
        return Ok(DocumentPayload::Scip(ScipDocument {
            bytes: bytes.clone(),
        }));
    }

    let ranges: HashMap<Id, RangeData> = decode_column(record.ranges.as_deref())?;
    if let Some((id, r)) = ranges.iter().find(|(_, r)| r.range().start > r.range().end) {
        return Err(CodecError::Invalid(format!(
            "range {} ends before it starts: {}",
            id,
            r.range()
        )));
    }
    let hover_results: HashMap<Id, String> = decode_column(record.hovers.as_deref())?;
    let monikers: HashMap<Id, MonikerData> = decode_column(record.monikers.as_deref())?;
    let package_information: HashMap<Id, PackageInformationData> =
        decode_column(record.packages.as_deref())?;
    let diagnostics: Vec<DiagnosticData> = decode_column(record.diagnostics.as_deref())?;

    Ok(DocumentPayload::Lsif(DocumentData {
        ranges,
        hover_results,
        monikers,
        package_information,
        diagnostics,
    }))
}

pub fn encode_result_chunk(
    upload_id: UploadId,
    index: u32,
    chunk: &ResultChunkData,
) -> Result<ResultChunkRecord, CodecError> {
    Ok(ResultChunkRecord {
        upload_id,
        index,
        document_paths: encode(&chunk.document_paths)?,
        document_id_range_ids: encode(&chunk.document_id_range_ids)?,
    })
}

pub fn decode_result_chunk(record: &ResultChunkRecord) -> Result<ResultChunkData, CodecError> {
    let document_paths: HashMap<Id, String> = decode(&record.document_paths)?;
    let document_id_range_ids: HashMap<Id, Vec<DocumentIdRangeId>> =
        decode(&record.document_id_range_ids)?;
    Ok(ResultChunkData {
        document_paths,
        document_id_range_ids,
    })
}

pub fn encode_locations(
    kind: ResultKind,
    upload_id: UploadId,
    moniker: &MonikerKey,
    rows: &[LocationData],
) -> Result<LocationRecord, CodecError> {
    Ok(LocationRecord {
        kind,
        upload_id,
        scheme: moniker.scheme.clone(),
        identifier: moniker.identifier.clone(),
        locations: encode(rows)?,
    })
}

pub fn decode_locations(record: &LocationRecord) -> Result<Vec<LocationData>, CodecError> {
    decode(&record.locations)
}
