fn main() -> Result<(), Box<dyn std::error::Error>> {
    fivepoints::cli::main()
}
