// Multipart framing for MJPEG-over-HTTP and a JPEG frame splitter

use bytes::{BufMut, Bytes, BytesMut};

/// MIME type of the never-ending multipart stream.
pub const MIME_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Part header carrying the boundary named in `MIME_TYPE`.
const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";

/// JPEG start-of-image / end-of-image markers.
const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Wrap one JPEG frame in its multipart part.
pub fn encapsulate(frame: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(PART_HEADER.len() + frame.len() + 2);
    buf.put_slice(PART_HEADER);
    buf.put_slice(frame);
    buf.put_slice(b"\r\n");
    buf.freeze()
}

/// Split a buffer of concatenated JPEG images (an MJPEG recording) into
/// individual frames by scanning for SOI/EOI marker pairs. A trailing
/// truncated image is dropped.
pub fn split_frames(data: &[u8]) -> Vec<Bytes> {
    let mut frames = Vec::new();
    let mut pos = 0;
    while let Some(start) = find_marker(data, pos, &SOI) {
        let Some(end) = find_marker(data, start + 2, &EOI) else {
            break;
        };
        frames.push(Bytes::copy_from_slice(&data[start..end + 2]));
        pos = end + 2;
    }
    frames
}

fn find_marker(data: &[u8], from: usize, marker: &[u8; 2]) -> Option<usize> {
    data.get(from..)?
        .windows(2)
        .position(|w| w == marker)
        .map(|i| from + i)
}
