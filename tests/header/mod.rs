use std::iter;

use tarwalk::{Header, TarError, BLOCK_SIZE};

fn block_of(header: &tar::Header) -> [u8; BLOCK_SIZE] {
    *header.as_bytes()
}

#[test]
fn fields_from_ustar() {
    let mut h = tar::Header::new_ustar();
    t!(h.set_path("foo/bar.txt"));
    h.set_size(1234);
    h.set_mode(0o640);
    h.set_mtime(1_000_000_000);
    h.set_entry_type(tar::EntryType::Regular);
    h.set_cksum();

    let parsed = t!(Header::parse(&block_of(&h)));
    assert!(parsed.is_ustar());
    assert!(!parsed.is_gnu());
    assert_eq!(parsed.path(), "foo/bar.txt");
    assert_eq!(t!(parsed.size()), 1234);
    assert_eq!(t!(parsed.entry_size()), 1536);
    assert_eq!(t!(parsed.mode()), 0o640);
    assert_eq!(t!(parsed.mtime()), 1_000_000_000);
    assert_eq!(t!(parsed.cksum()), parsed.compute_cksum());
    t!(parsed.verify_checksum());
    assert!(parsed.entry_type().is_file());
    assert_eq!(&parsed.as_bytes()[..], &h.as_bytes()[..]);
}

#[test]
fn long_ustar_path_uses_prefix() {
    let long = iter::repeat("dir/").take(30).collect::<String>() + "file.txt";
    let mut h = tar::Header::new_ustar();
    t!(h.set_path(&long));
    h.set_size(0);
    h.set_entry_type(tar::EntryType::Regular);
    h.set_cksum();

    let parsed = t!(Header::parse(&block_of(&h)));
    assert!(parsed.prefix[0] != 0);
    assert_eq!(parsed.path(), long);
    assert_eq!(&*parsed.path_bytes(), long.as_bytes());
}

#[test]
fn gnu_signature() {
    let mut h = tar::Header::new_gnu();
    t!(h.set_path("foo"));
    h.set_size(0);
    h.set_entry_type(tar::EntryType::Regular);
    h.set_cksum();

    let parsed = t!(Header::parse(&block_of(&h)));
    assert!(parsed.is_gnu());
    assert!(!parsed.is_ustar());
    assert_eq!(parsed.path(), "foo");
}

#[test]
fn old_headers_are_not_ustar() {
    let mut h = tar::Header::new_old();
    t!(h.set_path("foo"));
    h.set_entry_type(tar::EntryType::Regular);
    h.set_cksum();
    assert!(matches!(
        Header::parse(&block_of(&h)),
        Err(TarError::NotATar)
    ));
}

#[test]
fn regular_type_flags() {
    let flags = [
        (b'0', true),
        (0, true),
        (b'1', false),
        (b'2', false),
        (b'5', false),
        (b'L', false),
        (b'x', false),
    ];
    for (flag, ok) in flags {
        let mut h = tar::Header::new_ustar();
        t!(h.set_path("foo"));
        let mut block = block_of(&h);
        // tar normalizes a NUL flag to '0', so write the byte directly
        block[156] = flag;
        let res = Header::parse(&block);
        assert_eq!(res.is_ok(), ok, "flag {:?}", flag as char);
        if let Err(TarError::UnsupportedType(kind)) = res {
            assert_eq!(kind.as_byte(), flag);
        }
    }
}

#[test]
fn octal_spaces() {
    let mut block = block_of(&tar::Header::new_ustar());
    block[..3].copy_from_slice(b"foo");
    block[100..108].copy_from_slice(b"   777 \0");
    block[124..136].copy_from_slice(b"          2 ");
    block[136..148].copy_from_slice(b"12440016664\0");
    block[156] = b'0';

    let h = t!(Header::parse(&block));
    assert_eq!(t!(h.mode()), 0o777);
    assert_eq!(t!(h.size()), 2);
    assert_eq!(t!(h.mtime()), 0o12440016664);
}

#[test]
fn size_field_errors() {
    let mut block = block_of(&tar::Header::new_ustar());
    block[156] = b'0';
    block[124..136].copy_from_slice(b"-0000000012\0");
    let h = t!(Header::parse(&block));
    assert!(matches!(h.size(), Err(TarError::InvalidSize(_))));

    block[124..136].copy_from_slice(b"00000000012x");
    let h = t!(Header::parse(&block));
    assert_eq!(t!(h.size()), 10);

    block[124..136].copy_from_slice(b"zzzzzzzzzzzz");
    let h = t!(Header::parse(&block));
    assert_eq!(t!(h.size()), 0);
    assert_eq!(t!(h.entry_size()), 0);
}
