use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames_scanned: u64,
    pub regions_found: u64,
    pub full_frame_fallbacks: u64,
    pub symbols_decoded: u64,
    pub chunks_accepted: u64,
    pub invalid_frames: u64,
    pub duplicates: u64,
    pub out_of_range: u64,
    pub total_mismatches: u64,
}
