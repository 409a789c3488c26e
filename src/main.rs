use microflate::inflate_to_vec;

/// A raw DEFLATE stream holding a short piece of text.
const DATA_COMPRESSED: &[u8] = &[
    0x0b, 0xc9, 0x48, 0x55, 0x28, 0x2c, 0xcd, 0x4c, 0xce, 0x56, 0x48, 0x2a, 0xca, 0x2f,
    0xcf, 0x53, 0x48, 0xcb, 0xaf, 0x50, 0xc8, 0x2a, 0xcd, 0x2d, 0x28, 0x56, 0xc8, 0x2f,
    0x4b, 0x2d, 0x52, 0x28, 0x01, 0x4a, 0xe7, 0x24, 0x56, 0x55, 0x2a, 0xa4, 0xe4, 0xa7,
    0xeb, 0x71, 0xb9, 0xb8, 0xba, 0xf9, 0x38, 0x86, 0xb8, 0x2a, 0x64, 0x16, 0x2b, 0xf8,
    0x44, 0x99, 0x9b, 0x2b, 0x14, 0xe4, 0x94, 0x16, 0x2b, 0x78, 0x94, 0xa6, 0xa5, 0xe5,
    0x26, 0xe6, 0x29, 0x24, 0xe7, 0xa7, 0x64, 0xe6, 0x01, 0x15, 0x85, 0x0c, 0x01, 0x13,
    0x01,
];

fn main() {
    let data = inflate_to_vec(DATA_COMPRESSED).unwrap();
    println!("{}", String::from_utf8_lossy(&data));
    println!("Data: \n{}", display_data(&data));
}

/// Display the data in hex format, sixteen bytes per row with an ASCII
/// column.
fn display_data(data: &[u8]) -> String {
    let mut result = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        let hex: String = chunk.iter().map(|byte| format!("{byte:02x} ")).collect();
        let ascii: String = chunk
            .iter()
            .map(|&byte| {
                if byte.is_ascii_graphic() {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();
        result.push_str(&format!("{:08x}: {hex:48} |{ascii}|\n", i * 16));
    }

    result
}
