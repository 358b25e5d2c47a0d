use super::{TileMap, Viewport};
use crate::display::{ColorKey, PixelSurface};

/// Draw the part of `map` under `viewport` onto `target`
///
/// The viewport's top-left lands at the target origin. One slack row and
/// column are walked past the visible extent so partially visible tiles on
/// every edge get drawn; the blit clips them. Cells outside the grid and
/// indices outside the tile set are skipped. Returns the number of tiles
/// blitted.
#[tracing::instrument(level = "trace", skip_all, fields(x = viewport.x_offset, y = viewport.y_offset))]
pub fn render_tilemap(
    target: &mut PixelSurface,
    map: &TileMap,
    viewport: &Viewport,
    key: Option<ColorKey>,
) -> usize {
    let tw = map.tile_width() as i32;
    let th = map.tile_height() as i32;

    let start_col = viewport.x_offset.div_euclid(tw);
    let start_row = viewport.y_offset.div_euclid(th);
    let x_in_tile = viewport.x_offset.rem_euclid(tw);
    let y_in_tile = viewport.y_offset.rem_euclid(th);

    let rows = (viewport.height / map.tile_height()) as i32 + 1;
    let cols = (viewport.width / map.tile_width()) as i32 + 1;

    let mut drawn = 0;
    for y in 0..=rows {
        for x in 0..=cols {
            let (col, row) = (start_col + x, start_row + y);
            let Some(index) = map.index_at(col, row) else {
                continue;
            };
            let Some(tile) = map.tile_set().get(index as usize) else {
                tracing::trace!(col, row, index, "skipping unknown tile index");
                continue;
            };
            target.blit_with(
                tile.surface().source(),
                x * tw - x_in_tile,
                y * th - y_in_tile,
                key,
            );
            drawn += 1;
        }
    }
    drawn
}

/// Move the viewport by (dx, dy), clamping to `[0, map - viewport]` per axis
///
/// The camera never shows past the map edge. When the map is smaller than
/// the viewport on an axis, that offset is pinned to 0.
pub fn scroll_viewport(
    viewport: &mut Viewport,
    dx: i32,
    dy: i32,
    map_pixel_width: i32,
    map_pixel_height: i32,
) {
    let max_x = (map_pixel_width as i64 - viewport.width as i64).max(0);
    let max_y = (map_pixel_height as i64 - viewport.height as i64).max(0);
    viewport.x_offset = (viewport.x_offset as i64 + dx as i64).clamp(0, max_x) as i32;
    viewport.y_offset = (viewport.y_offset as i64 + dy as i64).clamp(0, max_y) as i32;
}
