//! Renders a memory block as 16-byte rows of offset, ASCII and hex, with
//! runs of identical rows collapsed into a single ` ...` marker.

use std::io::{self, Write};

const ROW_BYTES: usize = 16;

/// Writes `buffer` as rows of `ROW_BYTES`: the row's absolute offset in hex,
/// the bytes as ASCII (`.` for non-printables), then as hex pairs. A row
/// identical to the previous one is suppressed; the first suppressed row of
/// a run prints ` ...` instead. A final partial row is rendered at its
/// actual width, with the ASCII column alignment kept via spaces.
pub fn write_dump<W: Write>(out: &mut W, offset: u64, buffer: &[u8]) -> io::Result<()> {
    let rows = buffer.len().div_ceil(ROW_BYTES);
    let mut in_run = false;
    for row in 0..rows {
        let start = row * ROW_BYTES;
        let row_bytes = &buffer[start..buffer.len().min(start + ROW_BYTES)];
        if row > 0 && row_bytes == &buffer[start - ROW_BYTES..start - ROW_BYTES + row_bytes.len()] {
            if !in_run {
                writeln!(out, " ...")?;
                in_run = true;
            }
            continue;
        }
        in_run = false;

        write!(out, "{:08x} ", offset + start as u64)?;
        for byte in row_bytes {
            if (0x20..0x7f).contains(byte) {
                write!(out, "{}", *byte as char)?;
            } else {
                write!(out, ".")?;
            }
        }
        for _ in row_bytes.len()..ROW_BYTES + 1 {
            write!(out, "  ")?;
        }
        for byte in row_bytes {
            write!(out, "{byte:02x} ")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(offset: u64, buffer: &[u8]) -> String {
        let mut out = Vec::new();
        write_dump(&mut out, offset, buffer).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn formats_a_full_row() {
        let bytes: Vec<u8> = (0x41..=0x50).collect();
        assert_eq!(
            render(0x1000, &bytes),
            "00001000 ABCDEFGHIJKLMNOP  \
             41 42 43 44 45 46 47 48 49 4a 4b 4c 4d 4e 4f 50 \n"
        );
    }

    #[test]
    fn non_printable_bytes_render_as_dots() {
        let bytes = [0x00u8, 0x1f, 0x20, 0x7e, 0x7f, 0xff];
        let rendered = render(0, &bytes);
        assert!(rendered.starts_with("00000000 .. ~.."));
    }

    #[test]
    fn partial_final_row_keeps_ascii_alignment() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let rendered = render(0, &bytes);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        // 4 ASCII dots, then 13 alignment gaps of two spaces each
        let expected = format!("00000010 ....{}10 11 12 13 ", "  ".repeat(13));
        assert_eq!(lines[1], expected);
    }

    #[test]
    fn distinct_rows_render_without_markers() {
        let bytes: Vec<u8> = (0..100).map(|i| i as u8).collect();
        let rendered = render(0, &bytes);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 100usize.div_ceil(16));
        assert!(lines.iter().all(|line| *line != " ..."));
    }

    #[test]
    fn duplicate_run_collapses_to_one_marker() {
        // rows 1..=5 are identical; rows 2..=5 must never be printed
        let mut bytes = Vec::new();
        bytes.extend(0u8..16);
        for _ in 0..5 {
            bytes.extend([0xaau8; 16]);
        }
        bytes.extend(16u8..32);
        assert_eq!(bytes.len(), 7 * 16);

        let rendered = render(0, &bytes);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("00000000 "));
        assert!(lines[1].starts_with("00000010 "));
        assert_eq!(lines[2], " ...");
        assert!(lines[3].starts_with("00000060 "));
    }

    #[test]
    fn separate_runs_each_get_a_marker() {
        let mut bytes = Vec::new();
        bytes.extend([0x11u8; 32]);
        bytes.extend([0x22u8; 32]);
        let rendered = render(0, &bytes);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], " ...");
        assert!(lines[2].starts_with("00000020 "));
        assert_eq!(lines[3], " ...");
    }

    #[test]
    fn partial_row_matching_previous_prefix_is_suppressed() {
        let mut bytes = vec![0x33u8; 16];
        bytes.extend([0x33u8; 8]);
        let rendered = render(0, &bytes);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], " ...");
    }

    #[test]
    fn empty_buffer_renders_nothing() {
        assert_eq!(render(0x5000, &[]), "");
    }
}
