fn main() {
    #[cfg(target_os = "windows")]
    {
        println!("cargo:rerun-if-changed=assets/heatmap.ico");
        if std::path::Path::new("assets/heatmap.ico").exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon("assets/heatmap.ico");
            res.compile().expect("Failed to compile Windows resources");
        }
    }
}
