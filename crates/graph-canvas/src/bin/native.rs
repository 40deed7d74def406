fn main() -> eframe::Result<()> {
    graph_canvas::native::run()
}
