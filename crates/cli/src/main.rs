fn main() -> Result<(), Box<dyn std::error::Error>> {
    ticketlink_cli::run()
}
