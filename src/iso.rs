/// Isometric (diamond) projection between tile and screen coordinates.
///
/// A tile `(tx, ty)` lands at world `((tx - ty) * tw/2, (tx + ty) * th/2)`;
/// the camera offset is subtracted and the viewport center added to reach
/// screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoTransform {
    pub tile_width: f64,
    pub tile_height: f64,
    pub camera_x: f64,
    pub camera_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl IsoTransform {
    pub fn new(tile_width: f64, tile_height: f64, viewport_width: f64, viewport_height: f64) -> Self {
        IsoTransform {
            tile_width,
            tile_height,
            camera_x: 0.0,
            camera_y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    pub fn viewport_center(&self) -> (f64, f64) {
        (self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Tile coordinates (possibly fractional) to screen position
    pub fn tile_to_screen(&self, tile_x: f64, tile_y: f64) -> (f64, f64) {
        let (center_x, center_y) = self.viewport_center();
        let world_x = (tile_x - tile_y) * (self.tile_width / 2.0);
        let world_y = (tile_x + tile_y) * (self.tile_height / 2.0);
        (
            world_x - self.camera_x + center_x,
            world_y - self.camera_y + center_y,
        )
    }

    /// Screen position to fractional tile coordinates
    pub fn screen_to_tile(&self, screen_x: f64, screen_y: f64) -> (f64, f64) {
        let (center_x, center_y) = self.viewport_center();
        let world_x = screen_x - center_x + self.camera_x;
        let world_y = screen_y - center_y + self.camera_y;

        let half_w = world_x / (self.tile_width / 2.0);
        let half_h = world_y / (self.tile_height / 2.0);
        ((half_w + half_h) / 2.0, (half_h - half_w) / 2.0)
    }

    /// Screen position to the integer cell under it (hit testing)
    pub fn screen_to_cell(&self, screen_x: f64, screen_y: f64) -> (i32, i32) {
        let (tile_x, tile_y) = self.screen_to_tile(screen_x, screen_y);
        // Nudge by a tiny epsilon so exact tile corners don't flip to the
        // previous cell through rounding noise.
        const EPS: f64 = 1e-9;
        ((tile_x + EPS).floor() as i32, (tile_y + EPS).floor() as i32)
    }

    /// Camera position that puts the tile at the viewport center
    fn centered_camera(&self, tile_x: f64, tile_y: f64) -> (f64, f64) {
        let world_x = (tile_x - tile_y) * (self.tile_width / 2.0);
        let world_y = (tile_x + tile_y) * (self.tile_height / 2.0);
        (world_x, world_y)
    }

    pub fn center_on(&mut self, tile_x: f64, tile_y: f64) {
        let (camera_x, camera_y) = self.centered_camera(tile_x, tile_y);
        self.camera_x = camera_x;
        self.camera_y = camera_y;
    }

    /// Ease the camera toward the tile by `easing` (0..=1) of the remaining distance
    pub fn follow(&mut self, tile_x: f64, tile_y: f64, easing: f64) {
        let (target_x, target_y) = self.centered_camera(tile_x, tile_y);
        self.camera_x += (target_x - self.camera_x) * easing;
        self.camera_y += (target_y - self.camera_y) * easing;
    }

    /// Angle in radians from the viewport center to a screen point
    pub fn facing_angle(&self, screen_x: f64, screen_y: f64) -> f64 {
        let (center_x, center_y) = self.viewport_center();
        (screen_y - center_y).atan2(screen_x - center_x)
    }
}

impl Default for IsoTransform {
    fn default() -> Self {
        IsoTransform::new(64.0, 32.0, 800.0, 600.0)
    }
}
