use acorn_json::{decode, decode_with_features, encode, CpuFeatures};

pub fn de(input: &[u8]) {
    // Decoding arbitrary bytes must never panic, and every scan tier must
    // agree on both the decoded value and the failure
    let auto = decode(input);
    let scalar = decode_with_features(input, CpuFeatures::scalar());

    match (auto, scalar) {
        (Ok(auto), Ok(scalar)) => {
            // Compare trees through their encodings; value equality walks
            // the tree recursively and fuzzed inputs can nest arbitrarily
            // deep
            let encoded = encode(&auto);
            assert_eq!(encoded, encode(&scalar));

            // Anything we accept and can encode must decode back to the
            // same tree. Encoding can fail: a float like `1e999` decodes
            // to infinity, which has no JSON representation
            if let Ok(encoded) = encoded {
                let decoded = decode(&encoded).expect("encoded output is valid JSON");

                assert_eq!(Ok(encoded), encode(&decoded));
            }
        }
        (auto, scalar) => {
            assert_eq!(auto.err(), scalar.err());
        }
    }
}
