use crate::buffer::CaptureBuffer;

#[test]
fn test_push_stores_data_in_order() {
    let mut inner = [0x0; 8];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(b'a').unwrap();
    buffer.push(b'b').unwrap();
    buffer.push(b'c').unwrap();

    assert_eq!(b"abc", buffer.as_bytes());
    assert_eq!(3, buffer.len());
}

#[test]
fn test_push_rejects_terminator_slot() {
    let mut inner = [0x0; 4];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(b'a').unwrap();
    buffer.push(b'b').unwrap();
    buffer.push(b'c').unwrap();

    // Only the terminator slot is left
    assert_eq!(Err(b'd'), buffer.push(b'd'));
    assert_eq!(b"abc", buffer.as_bytes());
}

#[test]
fn test_push_one_byte_capacity_holds_no_data() {
    let mut inner = [0x0; 1];
    let mut buffer = CaptureBuffer::new(&mut inner);

    assert_eq!(Err(b'x'), buffer.push(b'x'));
    assert_eq!(0, buffer.len());
}

#[test]
fn test_push_zero_capacity_holds_no_data() {
    let mut inner = [0x0; 0];
    let mut buffer = CaptureBuffer::new(&mut inner);

    assert_eq!(Err(b'x'), buffer.push(b'x'));
}

#[test]
fn test_is_full_zero_capacity() {
    let mut inner = [0x0; 0];
    let buffer = CaptureBuffer::new(&mut inner);

    assert!(buffer.is_full());
}

#[test]
fn test_is_full_one_byte_capacity() {
    let mut inner = [0x0; 1];
    let buffer = CaptureBuffer::new(&mut inner);

    assert!(buffer.is_full());
}

#[test]
fn test_is_full_false_with_space_left() {
    let mut inner = [0x0; 4];
    let mut buffer = CaptureBuffer::new(&mut inner);
    buffer.push(b'a').unwrap();

    assert!(!buffer.is_full());
}

#[test]
fn test_is_full_true_at_data_capacity() {
    let mut inner = [0x0; 4];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(b'a').unwrap();
    buffer.push(b'b').unwrap();
    buffer.push(b'c').unwrap();

    assert!(buffer.is_full());
}

#[test]
fn test_terminate_writes_nul_behind_data() {
    let mut inner = [0xff; 4];

    let mut buffer = CaptureBuffer::new(&mut inner);
    buffer.push(b'a').unwrap();
    buffer.push(b'b').unwrap();
    buffer.terminate();

    assert_eq!([b'a', b'b', 0x0, 0xff], inner);
}

#[test]
fn test_terminate_zero_capacity_is_safe() {
    let mut inner = [0x0; 0];

    let mut buffer = CaptureBuffer::new(&mut inner);
    buffer.terminate();

    assert_eq!(0, buffer.len());
}

#[test]
fn test_terminate_empty_capture() {
    let mut inner = [0xff; 2];

    let mut buffer = CaptureBuffer::new(&mut inner);
    buffer.terminate();

    assert_eq!([0x0, 0xff], inner);
}

#[test]
fn test_as_str_valid_utf8() {
    let mut inner = [0x0; 8];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(b'1').unwrap();
    buffer.push(b'.').unwrap();
    buffer.push(b'2').unwrap();

    assert_eq!(Some("1.2"), buffer.as_str());
}

#[test]
fn test_as_str_invalid_utf8() {
    let mut inner = [0x0; 8];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(0xff).unwrap();
    buffer.push(0xfe).unwrap();

    assert_eq!(None, buffer.as_str());
}

#[test]
fn test_clear_resets_position_only() {
    let mut inner = [0x0; 8];
    let mut buffer = CaptureBuffer::new(&mut inner);

    buffer.push(b'a').unwrap();
    buffer.push(b'b').unwrap();
    buffer.clear();

    assert_eq!(0, buffer.len());
    assert!(buffer.is_empty());

    buffer.push(b'x').unwrap();
    assert_eq!(b"x", buffer.as_bytes());
}

#[test]
fn test_capacity_reports_region_size() {
    let mut inner = [0x0; 8];
    let buffer = CaptureBuffer::new(&mut inner);

    assert_eq!(8, buffer.capacity());
    assert_eq!(0, buffer.len());
    assert!(buffer.is_empty());
}
