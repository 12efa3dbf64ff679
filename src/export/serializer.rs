//! Binary model serialization

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VelozError};
use crate::inference::{BinaryModel, Classifier, MultiLabelModel};
use crate::preprocessing::{FeatureStats, Standardizer};

/// Magic bytes identifying a veloz model file
const MAGIC: [u8; 4] = [b'V', b'L', b'Z', b'M'];
/// Current format version
const FORMAT_VERSION: u32 = 1;
/// Learner-type tag for logistic regression models
const LEARNER_LOGISTIC: u32 = 1;

/// Envelope around the serialized model payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelEnvelope {
    magic: [u8; 4],
    format_version: u32,
    learner_type: u32,
    model_data: Vec<u8>,
    checksum: u64,
}

impl ModelEnvelope {
    fn new(learner_type: u32, model_data: Vec<u8>) -> Self {
        let checksum = fnv1a(&model_data);
        Self {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            learner_type,
            model_data,
            checksum,
        }
    }

    fn verify_checksum(&self) -> bool {
        fnv1a(&self.model_data) == self.checksum
    }
}

/// FNV-1a hash for payload integrity
fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Payload of a persisted logistic model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogisticRecord {
    accuracy: f64,
    labels: Vec<String>,
    models: Vec<BinaryRecord>,
}

/// One binary model as parallel per-feature arrays, in sorted feature order
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinaryRecord {
    features: Vec<String>,
    means: Vec<f64>,
    std_devs: Vec<f64>,
    weights: Vec<f64>,
}

impl BinaryRecord {
    fn from_model(model: &BinaryModel) -> Result<Self> {
        let n = model.weights().len();
        let mut features = Vec::with_capacity(n);
        let mut means = Vec::with_capacity(n);
        let mut std_devs = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        for (name, weight) in model.weights() {
            let stats = model.standardizer().get(name).ok_or_else(|| {
                VelozError::SerializationError(format!(
                    "feature '{}' has no standardization statistics",
                    name
                ))
            })?;
            features.push(name.clone());
            means.push(stats.mean);
            std_devs.push(stats.std_dev);
            weights.push(*weight);
        }
        Ok(Self {
            features,
            means,
            std_devs,
            weights,
        })
    }

    fn into_model(self) -> Result<BinaryModel> {
        let n = self.features.len();
        if self.means.len() != n || self.std_devs.len() != n || self.weights.len() != n {
            return Err(VelozError::FormatError(format!(
                "parallel arrays disagree on length: {} features, {} means, {} std devs, {} weights",
                n,
                self.means.len(),
                self.std_devs.len(),
                self.weights.len()
            )));
        }

        let mut weight_map = BTreeMap::new();
        let mut stats = BTreeMap::new();
        for i in 0..n {
            let name = self.features[i].clone();
            weight_map.insert(name.clone(), self.weights[i]);
            stats.insert(
                name,
                FeatureStats {
                    mean: self.means[i],
                    std_dev: self.std_devs[i],
                },
            );
        }
        BinaryModel::new(weight_map, Standardizer::from_stats(stats))
            .map_err(|e| VelozError::FormatError(format!("invalid model payload: {}", e)))
    }
}

/// Encode a trained model for storage.
///
/// Feature arrays are emitted in sorted feature order, so two saves of the
/// same model produce identical bytes.
pub fn model_to_bytes(model: &MultiLabelModel) -> Result<Vec<u8>> {
    let models = model
        .binary_models()
        .iter()
        .map(BinaryRecord::from_model)
        .collect::<Result<Vec<_>>>()?;
    let record = LogisticRecord {
        accuracy: model.accuracy(),
        labels: model.labels().to_vec(),
        models,
    };
    let model_data = bincode::serialize(&record)
        .map_err(|e| VelozError::SerializationError(format!("Failed to serialize model: {}", e)))?;
    let envelope = ModelEnvelope::new(LEARNER_LOGISTIC, model_data);
    bincode::serialize(&envelope).map_err(|e| {
        VelozError::SerializationError(format!("Failed to serialize envelope: {}", e))
    })
}

/// Decode and verify the outer envelope. The learner-type tag is the
/// caller's to dispatch on.
fn decode_envelope(bytes: &[u8]) -> Result<ModelEnvelope> {
    let envelope: ModelEnvelope = bincode::deserialize(bytes)
        .map_err(|e| VelozError::FormatError(format!("not a veloz model: {}", e)))?;
    if envelope.magic != MAGIC {
        return Err(VelozError::FormatError("bad magic bytes".to_string()));
    }
    if envelope.format_version != FORMAT_VERSION {
        return Err(VelozError::FormatError(format!(
            "unsupported format version {}",
            envelope.format_version
        )));
    }
    if !envelope.verify_checksum() {
        return Err(VelozError::FormatError(
            "payload checksum mismatch".to_string(),
        ));
    }
    Ok(envelope)
}

fn decode_logistic(data: &[u8]) -> Result<MultiLabelModel> {
    let record: LogisticRecord = bincode::deserialize(data)
        .map_err(|e| VelozError::FormatError(format!("corrupt model payload: {}", e)))?;
    let models = record
        .models
        .into_iter()
        .map(BinaryRecord::into_model)
        .collect::<Result<Vec<_>>>()?;
    MultiLabelModel::new(record.labels, models, record.accuracy)
        .map_err(|e| VelozError::FormatError(format!("invalid model payload: {}", e)))
}

/// Decode a persisted logistic model. Every failure mode — undecodable
/// bytes, wrong magic or version, checksum mismatch, unrecognized tag,
/// inconsistent payload — is a [`VelozError::FormatError`]; nothing partial
/// escapes.
pub fn model_from_bytes(bytes: &[u8]) -> Result<MultiLabelModel> {
    let envelope = decode_envelope(bytes)?;
    if envelope.learner_type != LEARNER_LOGISTIC {
        return Err(VelozError::FormatError(format!(
            "unrecognized learner type tag {}",
            envelope.learner_type
        )));
    }
    decode_logistic(&envelope.model_data)
}

/// Decode any persisted classifier, dispatching on the learner-type tag.
pub fn load_classifier(bytes: &[u8]) -> Result<Box<dyn Classifier>> {
    let envelope = decode_envelope(bytes)?;
    match envelope.learner_type {
        LEARNER_LOGISTIC => Ok(Box::new(decode_logistic(&envelope.model_data)?)),
        tag => Err(VelozError::FormatError(format!(
            "unrecognized learner type tag {}",
            tag
        ))),
    }
}

/// Save a trained model to a file.
pub fn save_model(model: &MultiLabelModel, path: impl AsRef<Path>) -> Result<()> {
    let bytes = model_to_bytes(model)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Load a trained model from a file.
pub fn load_model(path: impl AsRef<Path>) -> Result<MultiLabelModel> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    model_from_bytes(&bytes)
}
