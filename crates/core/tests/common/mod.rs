#![allow(dead_code)]

use codenav_api::{
    DocumentData, Id, LocationData, MonikerData, MonikerKey, MonikerKind, PackageInformationData,
    Range, RangeData, ResultKind, UploadId,
};
use codenav_core::{MemoryBackend, StoreConfig, UploadWriter};
use std::sync::Arc;

pub fn moniker(kind: MonikerKind, scheme: &str, identifier: &str) -> MonikerData {
    MonikerData {
        kind,
        scheme: scheme.to_string(),
        identifier: identifier.to_string(),
        package_information_id: None,
    }
}

/// `func Pad(s string)` spanning [0:0, 5:0) with the parameter at [1:2, 1:8).
pub fn pad_document() -> DocumentData {
    let mut doc = DocumentData::default();
    doc.ranges.insert(
        Id::new("func"),
        RangeData::new(Range::new(0, 0, 5, 0))
            .with_monikers(["m-func-export", "m-func-import"])
            .with_hover("h-func")
            .with_definition("def-pad")
            .with_reference("ref-pad"),
    );
    doc.ranges.insert(
        Id::new("param"),
        RangeData::new(Range::new(1, 2, 1, 8))
            .with_monikers(["m-param"])
            .with_definition("def-s"),
    );
    doc.ranges.insert(
        Id::new("call"),
        RangeData::new(Range::new(8, 4, 8, 7)).with_reference("ref-pad"),
    );

    let mut export = moniker(MonikerKind::Export, "gomod", "leftpad:Pad");
    export.package_information_id = Some(Id::new("pkg"));
    doc.monikers.insert(Id::new("m-func-export"), export);
    doc.monikers.insert(
        Id::new("m-func-import"),
        moniker(MonikerKind::Import, "gomod", "strings:Pad"),
    );
    doc.monikers.insert(
        Id::new("m-param"),
        moniker(MonikerKind::Local, "gomod", "leftpad:Pad.s"),
    );
    doc.hover_results
        .insert(Id::new("h-func"), "func Pad(s string) string".to_string());
    doc.package_information.insert(
        Id::new("pkg"),
        PackageInformationData {
            manager: "gomod".to_string(),
            name: "leftpad".to_string(),
            version: "1.0.0".to_string(),
        },
    );
    doc
}

pub fn caller_document() -> DocumentData {
    let mut doc = DocumentData::default();
    doc.ranges.insert(
        Id::new("use"),
        RangeData::new(Range::new(3, 10, 3, 13)).with_reference("ref-pad"),
    );
    doc
}

/// Upload 1: two documents with cross-document references to `Pad`.
pub async fn pad_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    UploadWriter::new(UploadId(1))
        .with_document("pad.go", pad_document())
        .with_document("cmd/main.go", caller_document())
        .with_result("def-pad", [("pad.go", "func")])
        .with_result("def-s", [("pad.go", "param")])
        .with_result(
            "ref-pad",
            [("pad.go", "func"), ("pad.go", "call"), ("cmd/main.go", "use")],
        )
        .write_to(&backend, &StoreConfig::default())
        .await
        .unwrap();
    backend
}

pub fn leftpad() -> MonikerKey {
    MonikerKey::new("gomod", "leftpad")
}

pub fn version_row(version: &str) -> LocationData {
    LocationData::new(format!("vendor/leftpad@{version}/pad.go"), Range::new(2, 5, 2, 8))
}

/// Upload 2 references `(gomod, leftpad)` from three vendored versions.
pub async fn leftpad_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    UploadWriter::new(UploadId(2))
        .with_locations(
            ResultKind::References,
            leftpad(),
            ["2.1.0", "3.1.0", "4.1.0"].map(version_row),
        )
        .write_to(&backend, &StoreConfig::default())
        .await
        .unwrap();
    backend
}
