//! Capability flags. Every check fails soft to `false`.

use serde::Serialize;

use crate::config::STORAGE_PROBE_KEY;
use crate::environment::{Environment, Feature, StorageArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(rename = "webGL")]
    pub webgl: bool,
    #[serde(rename = "webGL2")]
    pub webgl2: bool,
    pub canvas: bool,
    pub audio_context: bool,
    pub crypto: bool,
    pub service_worker: bool,
    pub local_storage: bool,
    pub session_storage: bool,
    #[serde(rename = "indexedDB")]
    pub indexed_db: bool,
}

pub fn collect<E: Environment + ?Sized>(env: &E) -> FeatureFlags {
    FeatureFlags {
        webgl: check(env, Feature::WebGl),
        webgl2: check(env, Feature::WebGl2),
        canvas: check(env, Feature::Canvas),
        audio_context: check(env, Feature::OfflineAudio),
        crypto: check(env, Feature::Crypto),
        service_worker: check(env, Feature::ServiceWorker),
        local_storage: storage(env, StorageArea::Local),
        session_storage: storage(env, StorageArea::Session),
        indexed_db: check(env, Feature::IndexedDb),
    }
}

fn check<E: Environment + ?Sized>(env: &E, feature: Feature) -> bool {
    match env.has_feature(feature) {
        Ok(present) => present,
        Err(reason) => {
            log::debug!("feature check {:?} failed: {}", feature, reason);
            false
        }
    }
}

fn storage<E: Environment + ?Sized>(env: &E, area: StorageArea) -> bool {
    match env.storage_round_trip(area, STORAGE_PROBE_KEY) {
        Ok(()) => true,
        Err(reason) => {
            log::debug!("{:?} storage unusable: {}", area, reason);
            false
        }
    }
}
