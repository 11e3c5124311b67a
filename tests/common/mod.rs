// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use bazelbp::{AttributeValue, ConverterConfig, RuleRecord, ThirdPartyLib};

/// String-list attribute value
pub fn list(items: &[&str]) -> AttributeValue {
    AttributeValue::StringList(items.iter().map(|s| s.to_string()).collect())
}

/// A `cc_library` declared in `/apollo/<package>/BUILD`
pub fn cc_library(package: &str, target: &str) -> RuleRecord {
    RuleRecord::new(
        format!("//{}:{}", package, target),
        "cc_library",
        format!("/apollo/{}/BUILD:1:1", package),
    )
}

/// A `cc_binary` declared in `/apollo/<package>/BUILD`
pub fn cc_binary(package: &str, target: &str) -> RuleRecord {
    RuleRecord::new(
        format!("//{}:{}", package, target),
        "cc_binary",
        format!("/apollo/{}/BUILD:1:1", package),
    )
}

/// A `proto_library` with the given schema files
pub fn proto_library(package: &str, target: &str, protos: &[&str]) -> RuleRecord {
    let srcs: Vec<String> = protos
        .iter()
        .map(|p| format!("//{}:{}", package, p))
        .collect();
    RuleRecord::new(
        format!("//{}:{}", package, target),
        "proto_library",
        format!("/apollo/{}/BUILD:1:1", package),
    )
    .with_attr("srcs", AttributeValue::StringList(srcs))
}

/// Default config with a small baseline made of third-party libraries only
pub fn test_config() -> ConverterConfig {
    ConverterConfig {
        baseline_deps: vec!["@com_github_google_glog//:glog".to_string()],
        third_party: vec![
            ThirdPartyLib::new("@com_github_google_glog//:glog", "glog"),
            ThirdPartyLib::new("@com_google_protobuf//:protobuf", "libprotobuf-cpp-full"),
            ThirdPartyLib::new("@uuid//:uuid", "uuid"),
        ],
        ..ConverterConfig::default()
    }
}

/// A cquery jsonproto document for a small tree
pub const CQUERY_FIXTURE: &str = r#"{
  "results": [
    {
      "target": {
        "type": "RULE",
        "rule": {
          "name": "//cyber/base:signal",
          "ruleClass": "cc_library",
          "location": "/apollo/cyber/base/BUILD:10:1",
          "attribute": [
            {"name": "srcs", "type": "LABEL_LIST", "stringListValue": ["//cyber/base:signal.cc"], "explicitlySpecified": true},
            {"name": "hdrs", "type": "LABEL_LIST", "stringListValue": ["//cyber/base:signal.h"], "explicitlySpecified": true},
            {"name": "deps", "type": "LABEL_LIST", "stringListValue": ["//cyber/proto:record_cc_proto"], "explicitlySpecified": true},
            {"name": "linkstatic", "type": "BOOLEAN", "booleanValue": true},
            {"name": "linkshared", "type": "BOOLEAN"}
          ]
        }
      }
    },
    {
      "target": {
        "type": "RULE",
        "rule": {
          "name": "//cyber/proto:record_proto",
          "ruleClass": "proto_library",
          "location": "/apollo/cyber/proto/BUILD:3:1",
          "attribute": [
            {"name": "srcs", "type": "LABEL_LIST", "stringListValue": ["//cyber/proto:record.proto"], "explicitlySpecified": true}
          ]
        }
      }
    },
    {
      "target": {
        "type": "RULE",
        "rule": {
          "name": "//cyber/proto:record_cc_proto",
          "ruleClass": "cc_proto_library",
          "location": "/apollo/cyber/proto/BUILD:8:1",
          "attribute": [
            {"name": "deps", "type": "LABEL_LIST", "stringListValue": [":record_proto"], "explicitlySpecified": true}
          ]
        }
      }
    },
    {
      "target": {
        "type": "SOURCE_FILE",
        "sourceFile": {"name": "//cyber/base:signal.cc"}
      }
    }
  ]
}"#;
