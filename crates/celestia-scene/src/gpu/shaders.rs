//! WGSL sources. Every module shares the frame and object blocks.

const COMMON: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    ambient: vec4<f32>,
    light_position: array<vec4<f32>, 2>,
    light_color: array<vec4<f32>, 2>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    surface: vec4<f32>,
    sheen: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;
@group(1) @binding(0) var<uniform> object: Object;

struct MeshOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_mesh(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> MeshOut {
    let world = object.model * vec4<f32>(position, 1.0);
    var out: MeshOut;
    out.clip = frame.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = normalize((object.model * vec4<f32>(normal, 0.0)).xyz);
    out.uv = uv;
    return out;
}
"#;

const PLANET: &str = r#"
@group(2) @binding(0) var surface_map: texture_2d<f32>;
@group(2) @binding(1) var surface_sampler: sampler;

// Linear falloff to zero at `range`, shaped by `decay`.
fn attenuation(distance: f32, range: f32, decay: f32) -> f32 {
    if (range <= 0.0) {
        return 1.0;
    }
    return pow(clamp(1.0 - distance / range, 0.0, 1.0), decay);
}

fn specular_power(roughness: f32) -> f32 {
    let r = clamp(roughness, 0.04, 1.0);
    return 2.0 / (r * r * r * r) - 2.0;
}

@fragment
fn fs_planet(in: MeshOut) -> @location(0) vec4<f32> {
    let albedo = textureSample(surface_map, surface_sampler, in.uv).rgb * object.color.rgb;
    let roughness = object.surface.x;
    let metalness = object.surface.y;
    let clearcoat = object.surface.z;
    let clearcoat_roughness = object.surface.w;

    let n = normalize(in.normal);
    let v = normalize(frame.camera_pos.xyz - in.world_pos);
    let n_dot_v = clamp(dot(n, v), 0.0, 1.0);
    let f0 = mix(vec3<f32>(0.04), albedo, metalness);
    let diffuse_color = albedo * (1.0 - metalness);

    var color = diffuse_color * frame.ambient.rgb;
    for (var i = 0u; i < 2u; i = i + 1u) {
        let to_light = frame.light_position[i].xyz - in.world_pos;
        let distance = length(to_light);
        let l = to_light / max(distance, 1e-4);
        let h = normalize(l + v);
        let n_dot_l = clamp(dot(n, l), 0.0, 1.0);
        let n_dot_h = clamp(dot(n, h), 0.0, 1.0);
        let radiance = frame.light_color[i].rgb
            * attenuation(distance, frame.light_position[i].w, frame.light_color[i].w);

        let base_spec = f0 * pow(n_dot_h, specular_power(roughness));
        let coat_spec = vec3<f32>(0.04 * clearcoat) * pow(n_dot_h, specular_power(clearcoat_roughness));
        color = color + (diffuse_color + base_spec + coat_spec) * radiance * n_dot_l;
    }

    let rim = pow(1.0 - n_dot_v, 3.0);
    color = color + object.sheen.rgb * rim;

    let transmission = object.sheen.w;
    let alpha = object.color.a * (1.0 - 0.5 * transmission * n_dot_v);
    return vec4<f32>(color, alpha);
}
"#;

const SHELL: &str = r#"
@fragment
fn fs_shell(in: MeshOut) -> @location(0) vec4<f32> {
    return object.color;
}
"#;

/// Star billboards: one instance per star, six vertices per quad.
pub const STARS: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    ambient: vec4<f32>,
    light_position: array<vec4<f32>, 2>,
    light_color: array<vec4<f32>, 2>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    surface: vec4<f32>,
    sheen: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;
@group(1) @binding(0) var<uniform> object: Object;

struct StarOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
};

@vertex
fn vs_star(@builtin(vertex_index) index: u32, @location(0) center: vec3<f32>) -> StarOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[index % 6u];
    let half_size = object.params.x * 0.5;
    let offset = (frame.camera_right.xyz * corner.x + frame.camera_up.xyz * corner.y) * half_size;
    let world = object.model * vec4<f32>(center + offset, 1.0);

    var out: StarOut;
    out.clip = frame.view_proj * world;
    out.corner = corner;
    return out;
}

@fragment
fn fs_star(in: StarOut) -> @location(0) vec4<f32> {
    let d = length(in.corner);
    if (d > 1.0) {
        discard;
    }
    let alpha = object.color.a * (1.0 - smoothstep(0.6, 1.0, d));
    return vec4<f32>(object.color.rgb, alpha);
}
"#;

/// Lit, textured planet surface.
pub fn planet_source() -> String {
    format!("{COMMON}{PLANET}")
}

/// Flat translucent shells (atmosphere, halo).
pub fn shell_source() -> String {
    format!("{COMMON}{SHELL}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_define_entry_points() {
        let planet = planet_source();
        assert!(planet.contains("fn vs_mesh"));
        assert!(planet.contains("fn fs_planet"));
        let shell = shell_source();
        assert!(shell.contains("fn vs_mesh"));
        assert!(shell.contains("fn fs_shell"));
        assert!(!shell.contains("surface_map"));
        assert!(STARS.contains("fn vs_star") && STARS.contains("fn fs_star"));
    }
}
