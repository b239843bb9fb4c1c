fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile IAM service protos
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/iam.proto"], &["proto/"])?;

    println!("cargo:rerun-if-changed=proto/iam.proto");

    Ok(())
}
