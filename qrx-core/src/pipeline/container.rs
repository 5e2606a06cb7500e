use crate::error::PipelineError;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// First entry of a ZIP archive, in central-directory order.
pub fn first_entry(archive: &[u8]) -> Result<(String, Vec<u8>), PipelineError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| PipelineError::Container(format!("failed to read archive: {e}")))?;
    if zip.len() == 0 {
        return Err(PipelineError::Container("archive has no entries".into()));
    }
    let mut entry = zip
        .by_index(0)
        .map_err(|e| PipelineError::Container(format!("failed to read entry 0: {e}")))?;
    let name = entry.name().to_string();
    // the declared size is sender-controlled, so it is not used as a hint
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| PipelineError::Container(format!("failed to extract {name}: {e}")))?;
    Ok((name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            w.start_file(*name, SimpleFileOptions::default()).unwrap();
            w.write_all(data).unwrap();
        }
        w.finish().unwrap().into_inner()
    }

    #[test]
    fn picks_first_entry_without_sorting() {
        let z = zip_of(&[("zeta.txt", &b"last-alpha"[..]), ("alpha.txt", &b"first-alpha"[..])]);
        let (name, bytes) = first_entry(&z).unwrap();
        assert_eq!(name, "zeta.txt");
        assert_eq!(bytes, b"last-alpha");
    }

    #[test]
    fn empty_archive_is_an_error() {
        let z = zip_of(&[]);
        assert_eq!(
            first_entry(&z),
            Err(PipelineError::Container("archive has no entries".into()))
        );
    }

    fn le16(b: &[u8], at: usize) -> usize {
        usize::from(u16::from_le_bytes([b[at], b[at + 1]]))
    }

    /// Rewrite the ZIP64 uncompressed size of the first central-directory entry.
    fn patch_zip64_size(zip: &mut [u8], size: u64) {
        let cd = zip
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .expect("central directory");
        let name_len = le16(zip, cd + 28);
        let extra_len = le16(zip, cd + 30);
        let mut at = cd + 46 + name_len;
        let end = at + extra_len;
        while at + 4 <= end {
            let (id, len) = (le16(zip, at), le16(zip, at + 2));
            if id == 0x0001 {
                zip[at + 4..at + 12].copy_from_slice(&size.to_le_bytes());
                return;
            }
            at += 4 + len;
        }
        panic!("no zip64 extra field");
    }

    #[test]
    fn oversized_declared_length_does_not_abort() {
        let mut w = ZipWriter::new(Cursor::new(Vec::new()));
        w.start_file("big.bin", SimpleFileOptions::default().large_file(true))
            .unwrap();
        w.write_all(b"actually tiny").unwrap();
        let mut z = w.finish().unwrap().into_inner();
        patch_zip64_size(&mut z, u64::MAX);

        match first_entry(&z) {
            Ok((name, bytes)) => {
                assert_eq!(name, "big.bin");
                assert_eq!(bytes, b"actually tiny");
            }
            Err(e) => assert!(matches!(e, PipelineError::Container(_))),
        }
    }

    #[test]
    fn non_archive_is_an_error() {
        assert!(matches!(
            first_entry(b"definitely not a zip file"),
            Err(PipelineError::Container(_))
        ));
    }
}
